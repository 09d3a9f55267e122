//! Best-time score tracking across races.

pub mod ledger;

pub use ledger::{ScoreEntry, ScoreLedger};
