//! Defines the endpoint for creating a new transaction.

use axum::{Extension, extract::State, http::StatusCode};

use crate::{
    AppJson, Error,
    app_state::TransactionState,
    auth::Claims,
    transaction::{Transaction, TransactionForm},
};

/// A route handler for creating a new transaction owned by the caller.
///
/// Responds with 201 and the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(claims): Extension<Claims>,
    AppJson(form): AppJson<TransactionForm>,
) -> Result<(StatusCode, AppJson<Transaction>), Error> {
    let new_transaction = form.validate()?;

    let transaction = state
        .transaction_store
        .create(claims.id, new_transaction)?;

    tracing::debug!(
        "Created transaction {} for user {}",
        transaction.id,
        claims.id
    );

    Ok((StatusCode::CREATED, AppJson(transaction)))
}
