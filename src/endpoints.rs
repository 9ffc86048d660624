//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transaction/{transaction_id}', use [format_endpoint].

/// A liveness check that needs no authentication.
pub const TEST: &str = "/api/test";
/// The route for registering a new user.
pub const REGISTER: &str = "/api/register";
/// The route for logging in with a username and password.
pub const LOG_IN: &str = "/api/login";
/// The route for logging in as the demo user.
pub const DEMO_LOG_IN: &str = "/api/demo-login";
/// The route for creating a transaction.
pub const TRANSACTION: &str = "/api/transaction";
/// The route for updating or deleting a single transaction.
pub const TRANSACTION_BY_ID: &str = "/api/transaction/{transaction_id}";
/// The route for listing the user's transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the total of the user's transactions.
pub const BALANCE: &str = "/api/transactions/balance";
/// The route for deleting many transactions at once.
pub const BULK_DELETE: &str = "/api/transactions/delete";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace, e.g.
/// '{transaction_id}' in '/api/transaction/{transaction_id}'.
///
/// Assumes the path is ASCII and has at most one parameter. A path without
/// a parameter is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
