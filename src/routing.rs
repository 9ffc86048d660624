//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppJson, AppState, Error, REQUEST_BODY_LIMIT,
    auth::{auth_guard, demo_log_in, log_in, register_user},
    endpoints,
    transaction::{
        bulk_delete_transactions_endpoint, create_transaction_endpoint,
        delete_transaction_endpoint, edit_transaction_endpoint, get_balance_endpoint,
        list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::TEST, get(get_test))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(log_in))
        .route(endpoints::DEMO_LOG_IN, post(demo_log_in));

    let protected_routes = Router::new()
        .route(endpoints::TRANSACTION, post(create_transaction_endpoint))
        .route(
            endpoints::TRANSACTION_BY_ID,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .route(endpoints::BALANCE, get(get_balance_endpoint))
        .route(
            endpoints::BULK_DELETE,
            post(bulk_delete_transactions_endpoint),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .with_state(state)
}

/// The body of the liveness check response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResponse {
    /// Always "test ok".
    pub body: String,
}

/// Check that the server is up.
async fn get_test() -> AppJson<TestResponse> {
    AppJson(TestResponse {
        body: "test ok".to_owned(),
    })
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
