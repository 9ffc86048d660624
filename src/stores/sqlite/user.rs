//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{Error, PasswordHash, User, UserID, UserStore, Username};

/// Handles the creation and retrieval of User objects.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Errors
    ///
    /// Returns a [Error::DuplicateUsername] if the username is taken,
    /// [Error::DatabaseLockError] if the connection lock is poisoned, or
    /// [Error::SqlError] if some other SQL related error occurred.
    fn create(&self, username: Username, password_hash: PasswordHash) -> Result<User, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let user = connection
            .prepare(
                "INSERT INTO user (username, password) VALUES (?1, ?2)
                 RETURNING id, username, password",
            )?
            .query_row((username.as_ref(), password_hash.as_ref()), map_user_row)?;

        Ok(user)
    }

    /// Get the user from the database that has the specified `id`, or return
    /// [Error::NotFound] if such user does not exist.
    fn get(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare("SELECT id, username, password FROM user WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], map_user_row)
            .map_err(|error| error.into())
    }

    /// Get the user from the database that has the specified `username`, or
    /// return [Error::NotFound] if such user does not exist.
    fn get_by_username(&self, username: &Username) -> Result<User, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare("SELECT id, username, password FROM user WHERE username = :username")?
            .query_row(&[(":username", username.as_ref())], map_user_row)
            .map_err(|error| error.into())
    }
}

/// Create the user table.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_username: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserID::new(id),
        username: Username::new_unchecked(&raw_username),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}
