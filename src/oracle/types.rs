//! Oracle snapshot types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a tracked match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchStatus {
    /// Initial fetch has not completed for this record yet. Core-internal;
    /// never produced by the oracle.
    #[default]
    Searching,
    /// Match has not kicked off.
    Scheduled,
    /// Match is in play.
    Live,
    /// Match is over. Terminal: a record never reverts from this status.
    Finished,
}

/// One point-in-time result for a match, as reported by the oracle.
///
/// Ephemeral: consumed by a single merge and discarded. Scores are plain
/// integers (0 before kick-off); nullability lives on the match record,
/// which has no scores until its first merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleSnapshot {
    /// Home team score.
    pub home_score: u32,
    /// Away team score.
    pub away_score: u32,
    /// Reported match status.
    pub status: MatchStatus,
    /// Kick-off time ("HH:MM"), or the placeholder when unknown.
    pub start_time: String,
    /// Current match minute, if in play.
    pub minute: Option<u32>,
}

impl OracleSnapshot {
    /// Kick-off placeholder used when the oracle has no answer.
    pub const PLACEHOLDER_KICKOFF: &'static str = "--:--";

    /// Degraded snapshot substituted for any oracle failure.
    pub fn fallback() -> Self {
        Self {
            home_score: 0,
            away_score: 0,
            status: MatchStatus::Scheduled,
            start_time: Self::PLACEHOLDER_KICKOFF.to_string(),
            minute: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_from_string_works() {
        use std::str::FromStr;
        assert_eq!(MatchStatus::from_str("live").unwrap(), MatchStatus::Live);
        assert_eq!(
            MatchStatus::from_str("scheduled").unwrap(),
            MatchStatus::Scheduled
        );
        assert_eq!(
            MatchStatus::from_str("finished").unwrap(),
            MatchStatus::Finished
        );
        assert!(MatchStatus::from_str("postponed").is_err());
    }

    #[test]
    fn fallback_is_a_scheduled_placeholder() {
        let snapshot = OracleSnapshot::fallback();
        assert_eq!(snapshot.home_score, 0);
        assert_eq!(snapshot.away_score, 0);
        assert_eq!(snapshot.status, MatchStatus::Scheduled);
        assert_eq!(snapshot.start_time, "--:--");
        assert_eq!(snapshot.minute, None);
    }
}
