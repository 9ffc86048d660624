//! Core transaction types and the trait for stores that persist them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{Error, UserID, transaction::TransactionDateTime};

/// Integer ID of a transaction, unique across all users.
pub type TransactionId = i64;

/// A financial record owned by exactly one user.
///
/// A negative `price` is an expense and a positive `price` is income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short name for the transaction, e.g. "TV".
    pub name: String,
    /// Free text detailing the transaction, empty if not given.
    pub description: String,
    /// When the transaction happened.
    pub datetime: TransactionDateTime,
    /// The signed value of the transaction.
    pub price: f64,
    /// The user that owns the transaction.
    pub owner_id: UserID,
}

impl Transaction {
    /// Orders transactions newest first: by `datetime` descending, then by
    /// `id` descending.
    pub fn newest_first(a: &Transaction, b: &Transaction) -> Ordering {
        (b.datetime, b.id).cmp(&(a.datetime, a.id))
    }
}

/// The validated fields of a transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A short, non-empty name.
    pub name: String,
    /// Free text detailing the transaction.
    pub description: String,
    /// When the transaction happened.
    pub datetime: TransactionDateTime,
    /// The signed value of the transaction.
    pub price: f64,
}

/// The validated fields used to replace an existing transaction.
///
/// A `description` of `None` keeps the stored description.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionUpdate {
    /// A short, non-empty name.
    pub name: String,
    /// The new description, if one was given.
    pub description: Option<String>,
    /// When the transaction happened.
    pub datetime: TransactionDateTime,
    /// The signed value of the transaction.
    pub price: f64,
}

/// The running total of a user's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// The sum of the prices of all of the user's transactions.
    pub balance: f64,
    /// How many transactions the user has.
    pub count: usize,
}

/// Handles the creation, retrieval, update and deletion of [Transaction]s.
///
/// Every operation takes the ID of the requesting user as `owner` and only
/// ever sees the transactions that user owns.
pub trait TransactionStore: Send + Sync {
    /// Store a new transaction for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidForeignKey] if `owner` is not a stored user.
    fn create(&self, owner: UserID, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Get one of `owner`'s transactions by its ID.
    ///
    /// Returns [Error::NotFound] if `owner` has no transaction with the ID.
    fn get(&self, owner: UserID, id: TransactionId) -> Result<Transaction, Error>;

    /// Get all of `owner`'s transactions, newest first
    /// (see [Transaction::newest_first]).
    fn list(&self, owner: UserID) -> Result<Vec<Transaction>, Error>;

    /// Replace the fields of one of `owner`'s transactions and return the
    /// updated transaction.
    ///
    /// # Errors
    ///
    /// Returns [Error::UpdateMissingTransaction] if `owner` has no
    /// transaction with the ID. Nothing is changed in that case.
    fn update(
        &self,
        owner: UserID,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error>;

    /// Delete one of `owner`'s transactions.
    ///
    /// # Errors
    ///
    /// Returns [Error::DeleteMissingTransaction] if `owner` has no
    /// transaction with the ID.
    fn delete(&self, owner: UserID, id: TransactionId) -> Result<(), Error>;

    /// Delete every transaction in `ids` that `owner` owns in one step and
    /// return how many were deleted.
    ///
    /// IDs that do not exist or belong to another user are skipped. An ID
    /// that appears more than once is only counted once.
    fn delete_many(&self, owner: UserID, ids: &[TransactionId]) -> Result<usize, Error>;

    /// Sum the prices of `owner`'s transactions.
    fn balance(&self, owner: UserID) -> Result<Balance, Error>;
}
