use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    stores::LedgerStore,
    transaction::{Transaction, TransactionType},
};

/// The totals over every persisted transaction.
///
/// A balance is derived on demand and never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// The sum of all income values.
    pub income: f64,
    /// The sum of all outcome values.
    pub outcome: f64,
    /// `income - outcome`.
    pub total: f64,
}

impl Balance {
    /// Reduce `transactions` to their income, outcome and net totals.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self::from_entries(
            transactions
                .iter()
                .map(|transaction| (transaction.kind, transaction.value)),
        )
    }

    /// Sum `(type, value)` pairs in the order given.
    ///
    /// Every balance goes through this fold so that the same transactions
    /// always add up to exactly the same totals.
    fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (TransactionType, f64)>,
    {
        let (income, outcome) =
            entries
                .into_iter()
                .fold((0.0, 0.0), |(income, outcome), (kind, value)| match kind {
                    TransactionType::Income => (income + value, outcome),
                    TransactionType::Outcome => (income, outcome + value),
                });

        Self::new(income, outcome)
    }

    fn new(income: f64, outcome: f64) -> Self {
        Self {
            income,
            outcome,
            total: income - outcome,
        }
    }
}

/// Compute the current balance of `store`.
///
/// This only reads from the store. Callers that act on the result (e.g. to
/// reject an outcome) must hold exclusive access to the store until they are done.
///
/// # Errors
/// Returns an error if the store cannot be read.
pub fn compute_balance<S>(store: &S) -> Result<Balance, Error>
where
    S: LedgerStore + ?Sized,
{
    let balance = store.balance()?;
    tracing::debug!(
        "Computed balance: income {}, outcome {}, total {}",
        balance.income,
        balance.outcome,
        balance.total
    );

    Ok(balance)
}

/// Get the balance by reading only the type and value of each transaction.
///
/// The result must equal [Balance::from_transactions] over all transactions,
/// so the values are summed here in ID order rather than with SQLite's `SUM`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_balance(connection: &Connection) -> Result<Balance, Error> {
    let entries = connection
        .prepare("SELECT type, value FROM \"transaction\" ORDER BY id ASC")?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<(TransactionType, f64)>, rusqlite::Error>>()?;

    Ok(Balance::from_entries(entries))
}
