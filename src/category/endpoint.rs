//! Defines the endpoint for listing categories.

use axum::{Json, extract::State};

use crate::{Error, Ledger, category::Category};

/// A route handler that lists every category ordered by title.
pub async fn get_categories_endpoint(
    State(ledger): State<Ledger>,
) -> Result<Json<Vec<Category>>, Error> {
    ledger.list_categories().map(Json)
}
