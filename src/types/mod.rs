//! Type definitions for the fraud scoring service

pub mod transaction;
pub mod verdict;

pub use transaction::{TransactionInput, TransactionRecord};
pub use verdict::{BatchOutcome, Confidence, ItemOutcome, Verdict};
