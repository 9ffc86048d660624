//! Contains the SQLite implementations of the stores and a convenience
//! function for creating an [AppState] that uses them.

mod transaction;
mod user;

pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction, TransactionBehavior, vtab::array};

use crate::{AppState, Error};

use self::{transaction::create_transaction_table, user::create_user_table};

/// Create the tables for the domain models if they do not exist yet.
///
/// Foreign key enforcement is switched on for `connection` and the `rarray`
/// table-valued function is registered on it.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must come first.
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;
    array::load_module(connection)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
///
/// # Errors
///
/// Returns an error if the database cannot be initialized or `jwt_secret` is
/// empty.
pub fn create_app_state(
    db_connection: Connection,
    jwt_secret: &str,
    demo_password: Option<String>,
) -> Result<AppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    AppState::new(
        Arc::new(SQLiteUserStore::new(connection.clone())),
        Arc::new(SQLiteTransactionStore::new(connection)),
        jwt_secret,
        demo_password,
    )
}
