//! The ledger service shared by every request.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    balance::{Balance, compute_balance},
    category::{Category, get_all_categories},
    csv_import::{ImportRecord, import_batch, parse_csv},
    db::initialize,
    transaction::{
        CategorizedTransaction, Transaction, TransactionRequest, create_transaction,
        get_categorized_transactions,
    },
};

/// Owns the database connection and serializes every operation on it.
///
/// Each operation holds the connection lock from its balance check until its
/// last write, so two concurrent outcomes can never both pass the check
/// against the same balance, and two resolutions of the same new category
/// title can never both create it.
#[derive(Debug, Clone)]
pub struct Ledger {
    connection: Arc<Mutex<Connection>>,
}

impl Ledger {
    /// Create a ledger backed by `connection`, creating the tables if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// The current income, outcome and net totals.
    ///
    /// # Errors
    /// Returns a storage error if the database cannot be read.
    pub fn compute_balance(&self) -> Result<Balance, Error> {
        let connection = self.lock()?;

        compute_balance(&*connection)
    }

    /// Create a single transaction, see [create_transaction].
    ///
    /// The category and the transaction are written in one SQL transaction, so
    /// on any error nothing is saved.
    ///
    /// # Errors
    /// Returns the errors of [create_transaction], or a storage error if the
    /// SQL transaction cannot be started or committed.
    pub fn create_transaction(&self, request: TransactionRequest) -> Result<Transaction, Error> {
        let connection = self.lock()?;
        let tx = connection.unchecked_transaction()?;

        let transaction = create_transaction(request, &*tx)?;

        tx.commit()?;

        Ok(transaction)
    }

    /// Import already read CSV records, see [import_batch].
    ///
    /// # Errors
    /// Returns the errors of [import_batch].
    pub fn import_batch(&self, records: Vec<ImportRecord>) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        import_batch(records, &*connection)
    }

    /// Read the CSV file `text` and import its records.
    ///
    /// # Errors
    /// Returns [Error::InvalidCSV] if `text` is not valid CSV, otherwise the
    /// errors of [import_batch].
    pub fn import_csv(&self, text: &str) -> Result<Vec<Transaction>, Error> {
        let records = parse_csv(text)?;

        self.import_batch(records)
    }

    /// Every transaction with its category, in the order they were saved.
    ///
    /// # Errors
    /// Returns a storage error if the database cannot be read.
    pub fn list_transactions(&self) -> Result<Vec<CategorizedTransaction>, Error> {
        let connection = self.lock()?;

        get_categorized_transactions(&connection)
    }

    /// Every transaction with its category and the balance they add up to,
    /// read under one lock so the two always agree.
    ///
    /// # Errors
    /// Returns a storage error if the database cannot be read.
    pub fn list_transactions_with_balance(
        &self,
    ) -> Result<(Vec<CategorizedTransaction>, Balance), Error> {
        let connection = self.lock()?;

        let transactions = get_categorized_transactions(&connection)?;
        let balance = compute_balance(&*connection)?;

        Ok((transactions, balance))
    }

    /// Every category, ordered by title.
    ///
    /// # Errors
    /// Returns a storage error if the database cannot be read.
    pub fn list_categories(&self) -> Result<Vec<Category>, Error> {
        let connection = self.lock()?;

        get_all_categories(&connection)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}
