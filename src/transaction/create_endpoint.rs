//! Defines the endpoint for creating a new transaction.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Ledger,
    transaction::{Transaction, TransactionRequest, TransactionType},
};

/// The JSON body for creating a transaction.
///
/// The type is kept as a string so that an unknown type is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionForm {
    /// Text detailing the transaction.
    pub title: String,
    /// The value of the transaction.
    pub value: f64,
    /// Either "income" or "outcome".
    #[serde(rename = "type")]
    pub kind: String,
    /// The title of the category for the transaction.
    pub category: String,
}

/// A route handler for creating a new transaction, responds with the saved transaction.
pub async fn create_transaction_endpoint(
    State(ledger): State<Ledger>,
    Json(form): Json<TransactionForm>,
) -> Result<Json<Transaction>, Error> {
    let kind = form.kind.parse::<TransactionType>()?;

    let transaction = ledger
        .create_transaction(TransactionRequest {
            title: form.title,
            value: form.value,
            kind,
            category: form.category,
        })
        .inspect_err(|error| tracing::debug!("could not create transaction: {error}"))?;

    Ok(Json(transaction))
}
