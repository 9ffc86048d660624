//! Endpoints for deleting one or many transactions.

use std::collections::BTreeSet;

use axum::{
    Extension,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    AppJson, Error,
    app_state::TransactionState,
    auth::Claims,
    transaction::TransactionId,
};

/// The response to a successful delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// A human readable description of what was deleted.
    pub message: String,
}

/// A route handler for deleting one of the caller's transactions.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(claims): Extension<Claims>,
    Path(transaction_id): Path<String>,
) -> Result<AppJson<DeleteResponse>, Error> {
    let transaction_id: TransactionId = transaction_id
        .parse()
        .map_err(|_| Error::DeleteMissingTransaction)?;

    state
        .transaction_store
        .delete(claims.id, transaction_id)?;

    Ok(AppJson(DeleteResponse {
        message: "Transaction deleted successfully".to_owned(),
    }))
}

/// The body of a bulk delete request.
///
/// `ids` is kept as raw JSON so that a missing or malformed list is reported
/// as [Error::InvalidIds].
#[derive(Debug, Default, Deserialize)]
pub struct BulkDeleteRequest {
    /// The IDs of the transactions to delete.
    #[serde(default)]
    pub ids: Option<Value>,
}

/// The response to a successful bulk delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    /// A human readable description of what was deleted.
    pub message: String,
    /// How many transactions were deleted.
    pub deleted_count: usize,
}

/// A route handler for deleting many of the caller's transactions at once.
///
/// IDs that do not belong to the caller are skipped. Elements of `ids` that
/// are not transaction IDs (integers or strings holding integers) cannot
/// match a transaction and are skipped too.
///
/// # Errors
///
/// Returns [Error::InvalidIds] if `ids` is missing, not a list or empty, and
/// [Error::NoTransactionsDeleted] if none of the IDs matched.
pub async fn bulk_delete_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(claims): Extension<Claims>,
    AppJson(request): AppJson<BulkDeleteRequest>,
) -> Result<AppJson<BulkDeleteResponse>, Error> {
    let ids = parse_ids(request.ids)?;

    let deleted_count = state.transaction_store.delete_many(claims.id, &ids)?;

    if deleted_count == 0 {
        return Err(Error::NoTransactionsDeleted);
    }

    tracing::debug!("Deleted {deleted_count} transactions for user {}", claims.id);

    Ok(AppJson(BulkDeleteResponse {
        message: format!("{deleted_count} transaction(s) deleted successfully"),
        deleted_count,
    }))
}

/// Get the unique transaction IDs from the raw `ids` value.
fn parse_ids(ids: Option<Value>) -> Result<Vec<TransactionId>, Error> {
    let values = match ids {
        Some(Value::Array(values)) if !values.is_empty() => values,
        _ => return Err(Error::InvalidIds),
    };

    let ids: BTreeSet<TransactionId> = values
        .iter()
        .filter_map(|value| match value {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        })
        .collect();

    Ok(ids.into_iter().collect())
}
