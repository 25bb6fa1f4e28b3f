//! Slip-level progress aggregation.

use crate::tracker::MatchRecord;

use super::evaluator::{evaluate, BetOutcome};

/// Fraction of bets currently won, as a percentage (0 for an empty slip).
///
/// Recomputed fresh on every read; it can decrease when a previously
/// winning live score is overtaken.
pub fn progress(records: &[MatchRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let won = records
        .iter()
        .filter(|r| evaluate(r) == BetOutcome::Won)
        .count();
    won as f64 / records.len() as f64 * 100.0
}

/// Whether every bet on a non-empty slip is currently won.
pub fn all_won(records: &[MatchRecord]) -> bool {
    !records.is_empty() && records.iter().all(|r| evaluate(r) == BetOutcome::Won)
}

/// Whether any bet is currently lost.
pub fn any_lost(records: &[MatchRecord]) -> bool {
    records.iter().any(|r| evaluate(r) == BetOutcome::Lost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{MatchStatus, OracleSnapshot};
    use crate::slip::{BetEntry, Selection};

    fn record(id: usize, selection: Selection, scores: Option<(u32, u32)>) -> MatchRecord {
        let mut record = MatchRecord::from_entry(BetEntry {
            id,
            home_team: format!("Home {id}"),
            away_team: format!("Away {id}"),
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
    fn empty_collection_has_zero_progress() {
        assert_eq!(progress(&[]), 0.0);
        assert!(!all_won(&[]));
        assert!(!any_lost(&[]));
    }

    #[test]
    fn one_of_four_won_is_twenty_five_percent() {
        let records = vec![
            record(0, Selection::Home, Some((2, 1))), // won
            record(1, Selection::Home, Some((0, 1))), // lost
            record(2, Selection::Draw, Some((1, 0))), // lost
            record(3, Selection::Away, None),         // waiting
        ];
        assert_eq!(progress(&records), 25.0);
        assert!(!all_won(&records));
        assert!(any_lost(&records));
    }

    #[test]
    fn all_won_requires_every_bet() {
        let records = vec![
            record(0, Selection::Home, Some((1, 0))),
            record(1, Selection::Draw, Some((2, 2))),
        ];
        assert_eq!(progress(&records), 100.0);
        assert!(all_won(&records));
        assert!(!any_lost(&records));
    }

    #[test]
    fn progress_can_regress_when_a_lead_is_overturned() {
        let mut records = vec![record(0, Selection::Home, Some((1, 0)))];
        assert_eq!(progress(&records), 100.0);

        records[0].apply(&OracleSnapshot {
            home_score: 1,
            away_score: 2,
            status: MatchStatus::Live,
            start_time: "20:45".to_string(),
            minute: Some(80),
        });
        assert_eq!(progress(&records), 0.0);
    }
}
