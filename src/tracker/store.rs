//! The slip store: single-writer container for the match collection.
//!
//! The store owns the ordered collection behind one slip. The poller is its
//! only writer; readers (evaluator, aggregator, API handlers) see whole
//! records. Every merge is keyed by slip generation so an in-flight oracle
//! response for a discarded slip is dropped on arrival instead of
//! repopulating cleared state.

use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::debug;

use crate::metrics;
use crate::oracle::OracleSnapshot;
use crate::slip::BetEntry;

use super::record::MatchRecord;

/// Which pipeline stage produced a merge. Only refresh merges announce
/// goals, matching the presentation contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOrigin {
    /// Sequential initial load of a fresh slip.
    InitialLoad,
    /// Background or manual refresh.
    Refresh,
}

/// Change notification for presentation-side consumers.
#[derive(Debug, Clone)]
pub enum SlipEvent {
    /// The collection changed (load, merge, or reset).
    Updated,
    /// A refresh merge raised a score.
    Goal {
        /// Record id the goal belongs to.
        id: usize,
        /// Home team name.
        home_team: String,
        /// Away team name.
        away_team: String,
    },
    /// The initial load finished for the current slip.
    LoadComplete,
    /// The slip was discarded.
    Cleared,
}

#[derive(Default)]
struct Inner {
    generation: u64,
    loading: bool,
    records: Vec<MatchRecord>,
}

/// Shared state container for one slip's match collection.
pub struct SlipStore {
    inner: RwLock<Inner>,
    events: broadcast::Sender<SlipEvent>,
}

impl SlipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: RwLock::new(Inner::default()),
            events,
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SlipEvent> {
        self.events.subscribe()
    }

    /// Replace the collection with a fresh slip, all records searching.
    /// Returns the new slip generation that guards subsequent merges.
    pub fn begin_slip(&self, entries: Vec<BetEntry>) -> u64 {
        let generation = {
            let mut inner = self.write();
            inner.generation += 1;
            inner.loading = true;
            inner.records = entries.into_iter().map(MatchRecord::from_entry).collect();
            inner.generation
        };
        metrics::inc_slips_loaded();
        let _ = self.events.send(SlipEvent::Updated);
        generation
    }

    /// Mark the initial load of `generation` complete. Returns false when a
    /// newer slip has replaced it in the meantime.
    pub fn finish_load(&self, generation: u64) -> bool {
        let finished = {
            let mut inner = self.write();
            if inner.generation != generation || !inner.loading {
                false
            } else {
                inner.loading = false;
                true
            }
        };
        if finished {
            let _ = self.events.send(SlipEvent::LoadComplete);
        }
        finished
    }

    /// Discard the slip: bump the generation and empty the collection.
    pub fn clear(&self) {
        {
            let mut inner = self.write();
            inner.generation += 1;
            inner.loading = false;
            inner.records.clear();
        }
        let _ = self.events.send(SlipEvent::Cleared);
    }

    /// Merge a snapshot into the record `id` of slip `generation`.
    ///
    /// Returns false (and merges nothing) when the generation is stale —
    /// the response belongs to a discarded slip. Within one generation,
    /// merges are last-write-wins with no issue-time ordering check; a
    /// delayed response can transiently revert a score until the next
    /// refresh. Accepted for a best-effort live display.
    pub fn apply_snapshot(
        &self,
        generation: u64,
        id: usize,
        snapshot: &OracleSnapshot,
        origin: MergeOrigin,
    ) -> bool {
        let goal = {
            let mut inner = self.write();
            if inner.generation != generation {
                debug!(generation, id, "dropping snapshot for discarded slip");
                return false;
            }
            let Some(record) = inner.records.iter_mut().find(|r| r.id == id) else {
                return false;
            };

            let goal = origin == MergeOrigin::Refresh && record.goal_scored(snapshot);
            record.apply(snapshot);
            goal.then(|| (record.home_team.clone(), record.away_team.clone()))
        };

        if let Some((home_team, away_team)) = goal {
            metrics::inc_goals_detected();
            let _ = self.events.send(SlipEvent::Goal {
                id,
                home_team,
                away_team,
            });
        }
        let _ = self.events.send(SlipEvent::Updated);
        true
    }

    /// Current collection, in slip order.
    pub fn snapshot(&self) -> Vec<MatchRecord> {
        self.read().records.clone()
    }

    /// Current slip generation.
    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    /// Whether an initial load is in progress.
    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    /// Number of tracked records.
    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("slip store lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("slip store lock poisoned")
    }
}

impl Default for SlipStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::MatchStatus;
    use crate::slip::{parse_slip, Selection};

    fn entries() -> Vec<BetEntry> {
        parse_slip("Napoli - Juventus 1\nMilan - Inter X").unwrap()
    }

    fn live(home: u32, away: u32) -> OracleSnapshot {
        OracleSnapshot {
            home_score: home,
            away_score: away,
            status: MatchStatus::Live,
            start_time: "20:45".to_string(),
            minute: Some(12),
        }
    }

    #[test]
    fn begin_slip_resets_and_bumps_generation() {
        let store = SlipStore::new();
        let first = store.begin_slip(entries());
        let second = store.begin_slip(entries());

        assert!(second > first);
        assert_eq!(store.len(), 2);
        assert!(store.is_loading());
        assert_eq!(store.snapshot()[1].selection, Selection::Draw);
    }

    #[test]
    fn merge_preserves_slip_order() {
        let store = SlipStore::new();
        let generation = store.begin_slip(entries());

        // Merge out of order
        assert!(store.apply_snapshot(generation, 1, &live(0, 0), MergeOrigin::InitialLoad));
        assert!(store.apply_snapshot(generation, 0, &live(2, 1), MergeOrigin::InitialLoad));

        let records = store.snapshot();
        assert_eq!(records[0].home_team, "Napoli");
        assert_eq!(records[0].home_score, Some(2));
        assert_eq!(records[1].home_team, "Milan");
    }

    #[test]
    fn stale_generation_is_discarded() {
        let store = SlipStore::new();
        let generation = store.begin_slip(entries());
        store.clear();

        assert!(!store.apply_snapshot(generation, 0, &live(1, 0), MergeOrigin::Refresh));
        assert!(store.is_empty());
    }

    #[test]
    fn finish_load_only_applies_to_current_generation() {
        let store = SlipStore::new();
        let generation = store.begin_slip(entries());
        let newer = store.begin_slip(entries());

        assert!(!store.finish_load(generation));
        assert!(store.is_loading());
        assert!(store.finish_load(newer));
        assert!(!store.is_loading());
    }

    #[test]
    fn refresh_merge_announces_goals() {
        let store = SlipStore::new();
        let generation = store.begin_slip(entries());
        let mut events = store.subscribe();

        store.apply_snapshot(generation, 0, &live(0, 0), MergeOrigin::InitialLoad);
        store.apply_snapshot(generation, 0, &live(1, 0), MergeOrigin::Refresh);

        let mut saw_goal = false;
        while let Ok(event) = events.try_recv() {
            if let SlipEvent::Goal { id, .. } = event {
                assert_eq!(id, 0);
                saw_goal = true;
            }
        }
        assert!(saw_goal);
    }

    #[test]
    fn initial_load_merge_never_announces_goals() {
        let store = SlipStore::new();
        let generation = store.begin_slip(entries());
        let mut events = store.subscribe();

        store.apply_snapshot(generation, 0, &live(3, 0), MergeOrigin::InitialLoad);

        while let Ok(event) = events.try_recv() {
            assert!(!matches!(event, SlipEvent::Goal { .. }));
        }
    }
}
