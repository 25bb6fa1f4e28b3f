//! Bet outcome evaluation and progress aggregation.
//!
//! Pure read-side functions over the match collection. Outcomes are always
//! recomputed from the currently-known scores, never memoized: a live lead
//! counts as provisionally won and can flip back.

pub mod evaluator;
pub mod progress;

pub use evaluator::{evaluate, BetOutcome};
pub use progress::{all_won, any_lost, progress};
