//! Unified error types for the slip tracker.
//!
//! Oracle failures are deliberately absent here: the oracle boundary absorbs
//! every failure into a degraded snapshot, so the polling pipeline has no
//! error branches.

use thiserror::Error;

/// Unified error type for the slip tracker.
#[derive(Error, Debug)]
pub enum SlipError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Bet-slip parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bet-slip input errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No line of the slip matched the two-team pattern.
    #[error("no matches recognized in slip")]
    EmptySlip,
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, SlipError>;
