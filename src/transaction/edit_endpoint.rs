//! Defines the endpoint for updating a transaction.

use axum::{
    Extension,
    extract::{Path, State},
};

use crate::{
    AppJson, Error,
    app_state::TransactionState,
    auth::Claims,
    transaction::{Transaction, TransactionForm, TransactionId},
};

/// A route handler for replacing the fields of one of the caller's
/// transactions. Responds with the updated transaction.
///
/// The path ID is taken as text so that an ID that is not an integer is
/// reported as a missing transaction instead of a bad request.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(claims): Extension<Claims>,
    Path(transaction_id): Path<String>,
    AppJson(form): AppJson<TransactionForm>,
) -> Result<AppJson<Transaction>, Error> {
    let update = form.validate_update()?;

    let transaction_id: TransactionId = transaction_id
        .parse()
        .map_err(|_| Error::UpdateMissingTransaction)?;

    state
        .transaction_store
        .update(claims.id, transaction_id, update)
        .map(AppJson)
}
