//! Bet-slip parsing: free text in, structured bet entries out.

pub mod parser;
pub mod types;

pub use parser::parse_slip;
pub use types::{BetEntry, Selection};
