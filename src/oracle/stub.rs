//! Scripted score oracle for unit testing.
//!
//! This module provides a deterministic oracle that can be used in tests
//! without making real network requests: snapshots are scripted per team
//! pair, latency is injectable, and every call is recorded with its issue
//! time so ordering and spacing are assertable under paused time.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::{Duration, Instant};

use super::types::OracleSnapshot;
use super::ScoreOracle;

/// One recorded oracle call.
#[derive(Debug, Clone)]
pub struct StubCall {
    /// Queried home team.
    pub home_team: String,
    /// Queried away team.
    pub away_team: String,
    /// Issue time of the call (before any simulated latency).
    pub at: Instant,
}

/// Scripted oracle for tests.
///
/// Scripts are consumed in order per (home, away) pair; the last scripted
/// snapshot repeats once the sequence is exhausted. Unscripted pairs answer
/// with the fallback snapshot.
pub struct StubOracle {
    /// Simulated latency per call.
    latency: Duration,
    /// Scripted snapshot sequences by team pair.
    scripts: Mutex<HashMap<(String, String), Vec<OracleSnapshot>>>,
    /// Recorded calls in issue order.
    calls: Mutex<Vec<StubCall>>,
}

impl StubOracle {
    /// Create a stub with no latency and no scripts.
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// Create a stub whose calls take `latency` to resolve.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the snapshot sequence for a team pair.
    pub fn script(&self, home_team: &str, away_team: &str, snapshots: Vec<OracleSnapshot>) {
        let mut scripts = self.scripts.lock().expect("stub scripts lock poisoned");
        scripts.insert((home_team.to_string(), away_team.to_string()), snapshots);
    }

    /// All recorded calls, in issue order.
    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().expect("stub calls lock poisoned").clone()
    }

    /// Drain the recorded calls, returning them.
    pub fn take_calls(&self) -> Vec<StubCall> {
        std::mem::take(&mut *self.calls.lock().expect("stub calls lock poisoned"))
    }

    fn next_snapshot(&self, home_team: &str, away_team: &str) -> OracleSnapshot {
        let mut scripts = self.scripts.lock().expect("stub scripts lock poisoned");
        let key = (home_team.to_string(), away_team.to_string());
        match scripts.get_mut(&key) {
            Some(sequence) if sequence.len() > 1 => sequence.remove(0),
            Some(sequence) if sequence.len() == 1 => sequence[0].clone(),
            _ => OracleSnapshot::fallback(),
        }
    }
}

impl Default for StubOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScoreOracle for StubOracle {
    async fn fetch_snapshot(&self, home_team: &str, away_team: &str) -> OracleSnapshot {
        {
            let mut calls = self.calls.lock().expect("stub calls lock poisoned");
            calls.push(StubCall {
                home_team: home_team.to_string(),
                away_team: away_team.to_string(),
                at: Instant::now(),
            });
        }

        if self.latency > Duration::ZERO {
            tokio::time::sleep(self.latency).await;
        }

        self.next_snapshot(home_team, away_team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::MatchStatus;

    fn live(home_score: u32, away_score: u32) -> OracleSnapshot {
        OracleSnapshot {
            home_score,
            away_score,
            status: MatchStatus::Live,
            start_time: "20:45".to_string(),
            minute: Some(10),
        }
    }

    #[tokio::test]
    async fn scripted_sequence_is_consumed_then_last_repeats() {
        let oracle = StubOracle::new();
        oracle.script("Napoli", "Juventus", vec![live(0, 0), live(1, 0)]);

        assert_eq!(oracle.fetch_snapshot("Napoli", "Juventus").await, live(0, 0));
        assert_eq!(oracle.fetch_snapshot("Napoli", "Juventus").await, live(1, 0));
        assert_eq!(oracle.fetch_snapshot("Napoli", "Juventus").await, live(1, 0));
    }

    #[tokio::test]
    async fn unscripted_pairs_get_the_fallback() {
        let oracle = StubOracle::new();
        let snapshot = oracle.fetch_snapshot("Roma", "Lazio").await;
        assert_eq!(snapshot, OracleSnapshot::fallback());
    }

    #[tokio::test]
    async fn calls_are_recorded_in_order() {
        let oracle = StubOracle::new();
        oracle.fetch_snapshot("Napoli", "Juventus").await;
        oracle.fetch_snapshot("Milan", "Inter").await;

        let calls = oracle.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].home_team, "Napoli");
        assert_eq!(calls[1].home_team, "Milan");

        assert_eq!(oracle.take_calls().len(), 2);
        assert!(oracle.calls().is_empty());
    }
}
