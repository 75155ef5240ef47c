//! Defines the endpoint for listing transactions.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{Error, Ledger, balance::Balance, transaction::CategorizedTransaction};

/// Every transaction and the balance they add up to.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionList {
    /// The transactions, in the order they were saved.
    pub transactions: Vec<CategorizedTransaction>,
    /// The balance over `transactions`.
    pub balance: Balance,
}

/// A route handler that lists every transaction along with the balance.
pub async fn get_transactions_endpoint(
    State(ledger): State<Ledger>,
) -> Result<Json<TransactionList>, Error> {
    let (transactions, balance) = ledger.list_transactions_with_balance()?;

    Ok(Json(TransactionList {
        transactions,
        balance,
    }))
}
