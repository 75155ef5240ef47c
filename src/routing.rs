//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState,
    balance::get_balance_endpoint,
    category::get_categories_endpoint,
    csv_import::import_transactions_endpoint,
    endpoints,
    logging::logging_middleware,
    transaction::{create_transaction_endpoint, get_transactions_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::IMPORT_TRANSACTIONS,
            post(import_transactions_endpoint),
        )
        .route(endpoints::BALANCE, get(get_balance_endpoint))
        .route(endpoints::CATEGORIES, get(get_categories_endpoint))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, build_router};

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let state = AppState::new(Connection::open_in_memory().unwrap()).unwrap();
        let server = TestServer::try_new(build_router(state)).expect("Could not create test server.");

        let response = server.get("/nope").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
