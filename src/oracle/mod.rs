//! Score oracle boundary.
//!
//! The oracle is an opaque, best-effort source of live match results. The
//! contract the rest of the crate relies on is narrow: one asynchronous
//! operation that always resolves to a snapshot, degrading to a placeholder
//! on any internal failure. Nothing about the underlying protocol (prompt
//! text, response schema) leaks past this module.

pub mod gemini;
pub mod offline;
pub mod stub;
pub mod types;

use async_trait::async_trait;

pub use gemini::GeminiOracle;
pub use offline::OfflineOracle;
pub use stub::StubOracle;
pub use types::{MatchStatus, OracleSnapshot};

/// Best-effort source of one score snapshot per (home, away) query.
///
/// Implementations never fail: any internal error resolves to
/// [`OracleSnapshot::fallback`]. No ordering guarantee exists between
/// independent calls; callers sequence them where ordering matters.
#[async_trait]
pub trait ScoreOracle: Send + Sync {
    /// Fetch the current snapshot for a match. May be arbitrarily slow or
    /// stale; the returned snapshot fully replaces previous knowledge.
    async fn fetch_snapshot(&self, home_team: &str, away_team: &str) -> OracleSnapshot;
}
