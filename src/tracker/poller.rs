//! Match polling: sequential initial load and periodic background refresh.
//!
//! The poller is the only writer of the slip store. The initial load walks
//! the collection in order with a self-imposed spacing between oracle calls
//! (the oracle never asks for it); background refresh fans out independent
//! calls on a fixed period. All spawned work is keyed by slip generation,
//! so cancellation only has to be best-effort: a task that outlives its
//! slip merges nothing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::ParseError;
use crate::oracle::{MatchStatus, ScoreOracle};
use crate::slip::parse_slip;

use super::record::MatchRecord;
use super::store::{MergeOrigin, SlipStore};

/// Orchestrates oracle polling for the slip store.
pub struct MatchPoller {
    store: Arc<SlipStore>,
    oracle: Arc<dyn ScoreOracle>,
    /// Spacing enforced after each initial-load call.
    initial_spacing: Duration,
    /// Background refresh period.
    refresh_period: Duration,
    load_task: Mutex<Option<JoinHandle<()>>>,
    refresh_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl MatchPoller {
    /// Create a poller over `store` backed by `oracle`.
    pub fn new(store: Arc<SlipStore>, oracle: Arc<dyn ScoreOracle>, config: &Config) -> Self {
        Self {
            store,
            oracle,
            initial_spacing: config.initial_spacing(),
            refresh_period: config.refresh_interval(),
            load_task: Mutex::new(None),
            refresh_task: Arc::new(Mutex::new(None)),
        }
    }

    /// Parse a slip and start tracking it, discarding any previous slip.
    ///
    /// Returns the number of recognized bets. A slip with no recognizable
    /// line is rejected without touching existing state.
    #[instrument(skip(self, text))]
    pub fn submit_slip(&self, text: &str) -> Result<usize, ParseError> {
        let entries = parse_slip(text)?;
        let count = entries.len();

        self.cancel_tasks();
        let generation = self.store.begin_slip(entries);
        info!(count, generation, "slip accepted, starting initial load");

        let handle = tokio::spawn(run_initial_load(
            Arc::clone(&self.store),
            Arc::clone(&self.oracle),
            generation,
            self.initial_spacing,
            self.refresh_period,
            Arc::clone(&self.refresh_task),
        ));
        *self.lock_load_task() = Some(handle);

        Ok(count)
    }

    /// Manual refresh: one oracle call per record regardless of status,
    /// finished matches included. Fire-and-forget.
    pub fn refresh_all(&self) {
        let records = self.store.snapshot();
        if records.is_empty() {
            return;
        }
        let generation = self.store.generation();
        info!(count = records.len(), "manual refresh requested");

        let store = Arc::clone(&self.store);
        let oracle = Arc::clone(&self.oracle);
        tokio::spawn(async move {
            let refreshes = records
                .into_iter()
                .map(|record| refresh_record(&store, &oracle, generation, record));
            futures::future::join_all(refreshes).await;
        });
    }

    /// Discard the current slip: stop all polling and empty the collection.
    pub fn clear(&self) {
        self.cancel_tasks();
        self.store.clear();
        info!("slip discarded");
    }

    fn cancel_tasks(&self) {
        if let Some(handle) = self.lock_load_task().take() {
            handle.abort();
        }
        if let Some(handle) = self
            .refresh_task
            .lock()
            .expect("refresh task lock poisoned")
            .take()
        {
            handle.abort();
        }
    }

    fn lock_load_task(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.load_task.lock().expect("load task lock poisoned")
    }
}

/// Sequential, spaced initial load; hands over to the refresh loop on
/// completion.
async fn run_initial_load(
    store: Arc<SlipStore>,
    oracle: Arc<dyn ScoreOracle>,
    generation: u64,
    spacing: Duration,
    refresh_period: Duration,
    refresh_slot: Arc<Mutex<Option<JoinHandle<()>>>>,
) {
    if store.generation() != generation {
        return;
    }

    for record in store.snapshot() {
        let snapshot = oracle
            .fetch_snapshot(&record.home_team, &record.away_team)
            .await;
        if !store.apply_snapshot(generation, record.id, &snapshot, MergeOrigin::InitialLoad) {
            debug!(generation, "slip replaced during initial load, stopping");
            return;
        }
        // Self-imposed oracle rate limit
        tokio::time::sleep(spacing).await;
    }

    if store.finish_load(generation) {
        info!(generation, "initial load complete");
        let handle = tokio::spawn(run_refresh_loop(store, oracle, generation, refresh_period));
        *refresh_slot.lock().expect("refresh task lock poisoned") = Some(handle);
    }
}

/// Periodic refresh of live and scheduled records. Finished records are
/// settled and never re-queried here.
async fn run_refresh_loop(
    store: Arc<SlipStore>,
    oracle: Arc<dyn ScoreOracle>,
    generation: u64,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    // interval fires immediately; the first refresh belongs one period out
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if store.generation() != generation || store.is_empty() {
            return;
        }

        let pending: Vec<MatchRecord> = store
            .snapshot()
            .into_iter()
            .filter(|r| matches!(r.status, MatchStatus::Live | MatchStatus::Scheduled))
            .collect();
        if pending.is_empty() {
            continue;
        }

        debug!(count = pending.len(), "background refresh tick");
        let refreshes = pending
            .into_iter()
            .map(|record| refresh_record(&store, &oracle, generation, record));
        futures::future::join_all(refreshes).await;
    }
}

/// One independent refresh call with the shared merge policy.
async fn refresh_record(
    store: &Arc<SlipStore>,
    oracle: &Arc<dyn ScoreOracle>,
    generation: u64,
    record: MatchRecord,
) {
    let snapshot = oracle
        .fetch_snapshot(&record.home_team, &record.away_team)
        .await;
    store.apply_snapshot(generation, record.id, &snapshot, MergeOrigin::Refresh);
}
