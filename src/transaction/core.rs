//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, ValidationError,
    category::{Category, map_category_row_with_offset},
    database_id::{CategoryId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money came into or went out of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Outcome,
}

impl TransactionType {
    /// The lowercase name used in CSV files, JSON and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Outcome => "outcome",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "outcome" => Ok(TransactionType::Outcome),
            other => Err(ValidationError::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An income or outcome, i.e. an event where money was either earned or spent.
///
/// Transactions are only created through the ledger, see [NewTransaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub title: String,
    /// The amount of money earned or spent, never negative.
    pub value: f64,
    /// Whether the value was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// When the transaction was saved.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A transaction that has passed validation and has a resolved category,
/// but has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A non-empty description of the transaction.
    pub title: String,
    /// A non-negative amount of money.
    pub value: f64,
    /// Whether the value was earned or spent.
    pub kind: TransactionType,
    /// The ID of an existing category.
    pub category_id: CategoryId,
}

/// A transaction with its category inlined, used when listing transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedTransaction {
    /// The transaction.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The category the transaction belongs to.
    pub category: Category,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `category_id` does not refer to a category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let now = OffsetDateTime::now_utc();

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (title, value, type, category_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, title, value, type, category_id, created_at, updated_at",
        )?
        .query_row(
            (
                transaction.title,
                transaction.value,
                transaction.kind,
                transaction.category_id,
                now,
                now,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::NotFound,
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve every transaction in the order they were saved.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, title, value, type, category_id, created_at, updated_at
             FROM \"transaction\" ORDER BY id ASC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve every transaction together with its category, in the order they were saved.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_categorized_transactions(
    connection: &Connection,
) -> Result<Vec<CategorizedTransaction>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.title, t.value, t.type, t.category_id, t.created_at, t.updated_at,
                    c.id, c.title, c.created_at, c.updated_at
             FROM \"transaction\" t
             INNER JOIN category c ON c.id = t.category_id
             ORDER BY t.id ASC",
        )?
        .query_map([], |row| {
            Ok(CategorizedTransaction {
                transaction: map_transaction_row(row)?,
                category: map_category_row_with_offset(row, 7)?,
            })
        })?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                value REAL NOT NULL CHECK (value >= 0),
                type TEXT NOT NULL CHECK (type IN ('income', 'outcome')),
                category_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let value = row.get(2)?;
    let kind = row.get(3)?;
    let category_id = row.get(4)?;
    let created_at = row.get(5)?;
    let updated_at = row.get(6)?;

    Ok(Transaction {
        id,
        title,
        value,
        kind,
        category_id,
        created_at,
        updated_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{CategoryTitle, create_category},
        db::initialize,
        transaction::{
            NewTransaction, TransactionType, count_transactions, get_all_transactions,
            get_categorized_transactions, insert_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_transaction(value: f64, category_id: i64) -> NewTransaction {
        NewTransaction {
            title: "Groceries".to_owned(),
            value,
            kind: TransactionType::Outcome,
            category_id,
        }
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let category = create_category(CategoryTitle::new_unchecked("Food"), &conn).unwrap();
        let value = 12.3;

        let result = insert_transaction(new_transaction(value, category.id), &conn);

        match result {
            Ok(transaction) => {
                assert!(transaction.id > 0);
                assert_eq!(transaction.value, value);
                assert_eq!(transaction.kind, TransactionType::Outcome);
                assert_eq!(transaction.category_id, category.id);
                assert_eq!(transaction.created_at, transaction.updated_at);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_invalid_category_id() {
        let conn = get_test_connection();

        let result = insert_transaction(new_transaction(1.0, 42), &conn);

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn get_all_returns_transactions_in_insertion_order() {
        let conn = get_test_connection();
        let category = create_category(CategoryTitle::new_unchecked("Food"), &conn).unwrap();
        let want: Vec<_> = (1..=5)
            .map(|i| insert_transaction(new_transaction(i as f64, category.id), &conn).unwrap())
            .collect();

        let got = get_all_transactions(&conn).unwrap();

        assert_eq!(want, got);
    }

    #[test]
    fn categorized_transactions_include_category() {
        let conn = get_test_connection();
        let category = create_category(CategoryTitle::new_unchecked("Food"), &conn).unwrap();
        let transaction = insert_transaction(new_transaction(5.0, category.id), &conn).unwrap();

        let got = get_categorized_transactions(&conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].transaction, transaction);
        assert_eq!(got[0].category, category);
    }
}
