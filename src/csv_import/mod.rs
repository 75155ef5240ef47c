//! Bulk import of transactions from CSV files.
//!
//! An import is checked as a whole before anything is saved: every row must
//! be well formed and the net effect of the batch must not take the balance
//! below zero.

mod import_endpoint;
mod import_transactions;
mod records;

pub use import_endpoint::import_transactions_endpoint;
pub use import_transactions::import_batch;
pub use records::{ImportRecord, parse_csv};
