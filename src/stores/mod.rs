//! Contains the implementations of the [UserStore](crate::UserStore) and
//! [TransactionStore](crate::TransactionStore) traits.
//!
//! The backend is picked when the server starts. There is no fallback from
//! one backend to another.

mod memory;

pub mod sqlite;

#[cfg(test)]
mod conformance;

pub use memory::MemoryStore;
pub use sqlite::{SQLiteTransactionStore, SQLiteUserStore, create_app_state};

use std::sync::Arc;

use crate::{AppState, Error};

/// Creates an [AppState] instance that keeps all data in memory.
///
/// # Errors
///
/// Returns an error if `jwt_secret` is empty.
pub fn create_memory_app_state(
    jwt_secret: &str,
    demo_password: Option<String>,
) -> Result<AppState, Error> {
    let store = Arc::new(MemoryStore::default());

    AppState::new(store.clone(), store, jwt_secret, demo_password)
}
