//! Endpoints for reading the caller's transactions.

use axum::{Extension, extract::State};

use crate::{
    AppJson, Error,
    app_state::TransactionState,
    auth::Claims,
    transaction::{Balance, Transaction},
};

/// A route handler for listing the caller's transactions, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(claims): Extension<Claims>,
) -> Result<AppJson<Vec<Transaction>>, Error> {
    state.transaction_store.list(claims.id).map(AppJson)
}

/// A route handler for the sum and count of the caller's transactions.
pub async fn get_balance_endpoint(
    State(state): State<TransactionState>,
    Extension(claims): Extension<Claims>,
) -> Result<AppJson<Balance>, Error> {
    state.transaction_store.balance(claims.id).map(AppJson)
}
