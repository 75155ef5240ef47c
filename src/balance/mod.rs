//! The balance of the ledger: income and outcome totals over every transaction.

mod core;
mod endpoint;

pub use core::{Balance, compute_balance, get_balance};
pub use endpoint::get_balance_endpoint;
