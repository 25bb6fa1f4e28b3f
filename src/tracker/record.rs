//! Match records and snapshot merging.

use serde::Serialize;
use time::OffsetDateTime;

use crate::oracle::{MatchStatus, OracleSnapshot};
use crate::slip::{BetEntry, Selection};

/// Live view of one slip entry, enriched by oracle snapshots.
///
/// Created in `Searching` with unknown scores; every mutable field is fully
/// replaced on each merge. `Finished` is terminal: later merges may still
/// correct scores but cannot change the status back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Slip entry id (positional, stable within one slip).
    pub id: usize,
    /// Home team name.
    pub home_team: String,
    /// Away team name.
    pub away_team: String,
    /// Predicted outcome the bet is placed on.
    pub selection: Selection,
    /// Home score, unknown until the first merge.
    pub home_score: Option<u32>,
    /// Away score, unknown until the first merge.
    pub away_score: Option<u32>,
    /// Lifecycle status.
    pub status: MatchStatus,
    /// Kick-off time ("HH:MM" or the placeholder).
    pub start_time: String,
    /// Current match minute, if in play.
    pub minute: Option<u32>,
    /// When the last snapshot was merged.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl MatchRecord {
    /// Create a fresh record for a parsed slip entry.
    pub fn from_entry(entry: BetEntry) -> Self {
        Self {
            id: entry.id,
            home_team: entry.home_team,
            away_team: entry.away_team,
            selection: entry.selection,
            home_score: None,
            away_score: None,
            status: MatchStatus::Searching,
            start_time: OracleSnapshot::PLACEHOLDER_KICKOFF.to_string(),
            minute: None,
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    /// Whether the match is currently in play.
    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Live
    }

    /// Whether merging `snapshot` would raise either score. Unknown old
    /// scores count as 0.
    pub fn goal_scored(&self, snapshot: &OracleSnapshot) -> bool {
        snapshot.home_score > self.home_score.unwrap_or(0)
            || snapshot.away_score > self.away_score.unwrap_or(0)
    }

    /// Merge a snapshot: full replacement of the mutable fields, never a
    /// partial patch. `Finished` status is clamped.
    pub fn apply(&mut self, snapshot: &OracleSnapshot) {
        self.home_score = Some(snapshot.home_score);
        self.away_score = Some(snapshot.away_score);
        if self.status != MatchStatus::Finished {
            self.status = snapshot.status;
        }
        self.start_time = snapshot.start_time.clone();
        self.minute = snapshot.minute;
        self.updated_at = OffsetDateTime::now_utc();
    }
}
