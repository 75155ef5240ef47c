//! The API endpoints URIs.

/// The route for listing and creating transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for importing transactions from CSV files.
pub const IMPORT_TRANSACTIONS: &str = "/transactions/import";
/// The route for getting the ledger balance.
pub const BALANCE: &str = "/balance";
/// The route for listing categories.
pub const CATEGORIES: &str = "/categories";
