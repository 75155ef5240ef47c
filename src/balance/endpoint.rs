//! Defines the endpoint for reading the balance.

use axum::{Json, extract::State};

use crate::{Error, Ledger, balance::Balance};

/// A route handler that responds with the current balance.
pub async fn get_balance_endpoint(State(ledger): State<Ledger>) -> Result<Json<Balance>, Error> {
    ledger.compute_balance().map(Json)
}
