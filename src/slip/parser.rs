//! Free-text bet-slip parsing.
//!
//! One wager per line, `"<Home> - <Away> [1|X|2]"` (or `vs` instead of the
//! hyphen). Lines that do not fit the two-team pattern are dropped, not
//! errors; a slip with zero recognized lines is rejected as user input.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{BetEntry, Selection};
use crate::error::ParseError;

/// Two team names split on a hyphen or "vs", optional trailing 1/X/2 marker.
static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(.+?)\s*(?:-+|\bvs\b)\s*(.+?)(?:\s+([12Xx]))?\s*$").expect("valid regex")
});

/// Parse a multi-line slip into bet entries.
///
/// Blank and unrecognizable lines are skipped. Entry ids are contiguous
/// 0-based positions in the output. Pure function.
pub fn parse_slip(text: &str) -> Result<Vec<BetEntry>, ParseError> {
    let mut entries = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let Some(captures) = LINE_PATTERN.captures(line) else {
            continue;
        };

        let home_team = captures[1].trim().to_string();
        let away_team = captures[2].trim().to_string();
        if home_team.is_empty() || away_team.is_empty() {
            continue;
        }

        let marker = captures.get(3).map(|m| m.as_str());
        let selection = extract_selection(line, marker);

        entries.push(BetEntry {
            id: entries.len(),
            home_team,
            away_team,
            selection,
        });
    }

    if entries.is_empty() {
        return Err(ParseError::EmptySlip);
    }

    Ok(entries)
}

/// Selection markers in priority order: X token or "pareggio" → Draw,
/// trailing 2 → Away, default Home.
fn extract_selection(line: &str, marker: Option<&str>) -> Selection {
    let is_draw_marker = marker.is_some_and(|m| m.eq_ignore_ascii_case("x"));
    if is_draw_marker || line.to_lowercase().contains("pareggio") {
        return Selection::Draw;
    }
    if marker == Some("2") {
        return Selection::Away;
    }
    Selection::Home
}
