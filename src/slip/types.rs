//! Bet-slip types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The predicted outcome a bet is placed on, in 1X2 notation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
pub enum Selection {
    /// Home win ("1"). Default when a line carries no marker.
    #[default]
    #[strum(to_string = "1")]
    #[serde(rename = "1")]
    Home,
    /// Draw ("X").
    #[strum(to_string = "X", serialize = "x")]
    #[serde(rename = "X")]
    Draw,
    /// Away win ("2").
    #[strum(to_string = "2")]
    #[serde(rename = "2")]
    Away,
}

/// One wager from a bet slip. Immutable once parsed.
///
/// `id` is the positional index within the slip (0-based, contiguous).
/// Team names are non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetEntry {
    /// Positional index within the slip.
    pub id: usize,
    /// Home team name.
    pub home_team: String,
    /// Away team name.
    pub away_team: String,
    /// Predicted outcome.
    pub selection: Selection,
}

impl BetEntry {
    /// Canonical slip-line form, re-parsable into an equivalent entry.
    pub fn slip_line(&self) -> String {
        format!("{} - {} {}", self.home_team, self.away_team, self.selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_from_string_works() {
        use std::str::FromStr;
        assert_eq!(Selection::from_str("1").unwrap(), Selection::Home);
        assert_eq!(Selection::from_str("X").unwrap(), Selection::Draw);
        assert_eq!(Selection::from_str("x").unwrap(), Selection::Draw);
        assert_eq!(Selection::from_str("2").unwrap(), Selection::Away);
    }

    #[test]
    fn selection_display_uses_1x2_tokens() {
        assert_eq!(Selection::Home.to_string(), "1");
        assert_eq!(Selection::Draw.to_string(), "X");
        assert_eq!(Selection::Away.to_string(), "2");
    }

    #[test]
    fn slip_line_round_trips_tokens() {
        let entry = BetEntry {
            id: 0,
            home_team: "Napoli".to_string(),
            away_team: "Juventus".to_string(),
            selection: Selection::Draw,
        };
        assert_eq!(entry.slip_line(), "Napoli - Juventus X");
    }
}
