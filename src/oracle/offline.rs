//! Offline score oracle.
//!
//! Used when no oracle credentials are configured. Every query answers with
//! the fallback snapshot, so the rest of the pipeline runs unchanged with
//! permanently-scheduled placeholder records.

use async_trait::async_trait;
use tracing::debug;

use super::types::OracleSnapshot;
use super::ScoreOracle;

/// Degraded-mode oracle that always returns the placeholder snapshot.
#[derive(Debug, Clone, Default)]
pub struct OfflineOracle;

impl OfflineOracle {
    /// Create a new offline oracle.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScoreOracle for OfflineOracle {
    async fn fetch_snapshot(&self, home_team: &str, away_team: &str) -> OracleSnapshot {
        debug!(home = %home_team, away = %away_team, "no oracle configured, returning placeholder");
        OracleSnapshot::fallback()
    }
}
