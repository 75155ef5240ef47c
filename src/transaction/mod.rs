//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionType`
//! - Database functions for storing and querying transactions
//! - The transaction creator that enforces the non-negative balance rule
//! - Route handlers for listing and creating transactions

mod core;
mod create;
mod create_endpoint;
mod list_endpoint;

pub use core::{
    CategorizedTransaction, NewTransaction, Transaction, TransactionType, create_transaction_table,
    get_all_transactions, get_categorized_transactions, insert_transaction, map_transaction_row,
};
pub use create::{TransactionRequest, create_transaction, validate_title, validate_value};
pub use create_endpoint::{TransactionForm, create_transaction_endpoint};
pub use list_endpoint::{TransactionList, get_transactions_endpoint};

#[cfg(test)]
pub use core::count_transactions;
