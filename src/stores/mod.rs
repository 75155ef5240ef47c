//! Contains the storage abstraction the ledger core is written against.

mod ledger_store;
mod sqlite;

pub use ledger_store::LedgerStore;
