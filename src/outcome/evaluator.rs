//! Single-bet outcome evaluation.

use serde::Serialize;
use strum::Display;

use crate::slip::Selection;
use crate::tracker::MatchRecord;

/// Current standing of one bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BetOutcome {
    /// No scores known yet.
    Waiting,
    /// The selection matches the current score.
    Won,
    /// The selection does not match the current score.
    Lost,
}

/// Evaluate a bet against the currently-known score.
///
/// Scores are compared regardless of match status: an in-play lead counts
/// as provisionally won (deliberate early feedback, not a bug).
pub fn evaluate(record: &MatchRecord) -> BetOutcome {
    let (Some(home), Some(away)) = (record.home_score, record.away_score) else {
        return BetOutcome::Waiting;
    };

    let won = match record.selection {
        Selection::Home => home > away,
        Selection::Draw => home == away,
        Selection::Away => away > home,
    };

    if won {
        BetOutcome::Won
    } else {
        BetOutcome::Lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{MatchStatus, OracleSnapshot};
    use crate::slip::BetEntry;

    fn record(selection: Selection, scores: Option<(u32, u32)>) -> MatchRecord {
        let mut record = MatchRecord::from_entry(BetEntry {
            id: 0,
            home_team: "Napoli".to_string(),
            away_team: "Juventus".to_string(),
            selection,
        });
        if let Some((home, away)) = scores {
            record.apply(&OracleSnapshot {
                home_score: home,
                away_score: away,
                status: MatchStatus::Live,
                start_time: "20:45".to_string(),
                minute: Some(30),
            });
        }
        record
    }

    #[test]
    fn home_selection_wins_on_home_lead() {
        assert_eq!(evaluate(&record(Selection::Home, Some((2, 1)))), BetOutcome::Won);
        assert_eq!(evaluate(&record(Selection::Home, Some((1, 1)))), BetOutcome::Lost);
        assert_eq!(evaluate(&record(Selection::Home, Some((0, 1)))), BetOutcome::Lost);
    }

    #[test]
    fn draw_selection_wins_on_level_score() {
        assert_eq!(evaluate(&record(Selection::Draw, Some((1, 1)))), BetOutcome::Won);
        assert_eq!(evaluate(&record(Selection::Draw, Some((2, 1)))), BetOutcome::Lost);
    }

    #[test]
    fn away_selection_loses_on_level_score() {
        assert_eq!(evaluate(&record(Selection::Away, Some((0, 0)))), BetOutcome::Lost);
        assert_eq!(evaluate(&record(Selection::Away, Some((0, 1)))), BetOutcome::Won);
    }

    #[test]
    fn unknown_scores_are_waiting() {
        assert_eq!(evaluate(&record(Selection::Home, None)), BetOutcome::Waiting);
    }

    #[test]
    fn in_play_scores_count_provisionally() {
        let record = record(Selection::Home, Some((1, 0)));
        assert_eq!(record.status, MatchStatus::Live);
        assert_eq!(evaluate(&record), BetOutcome::Won);
    }
}
