#![allow(missing_docs)]

use std::sync::Arc;

use rusqlite::Connection;

use crate::{
    AppState, Error, PasswordHash, User, UserID, UserStore, Username,
    app_state::AuthState,
    auth::TokenKeys,
    stores::{create_app_state, create_memory_app_state},
    transaction::{
        Balance, NewTransaction, Transaction, TransactionId, TransactionStore, TransactionUpdate,
    },
};

pub(crate) const TEST_SECRET: &str = "foobar";
/// bcrypt's minimum cost, so tests that hash passwords stay fast.
pub(crate) const TEST_PASSWORD_COST: u32 = 4;

pub(crate) fn get_test_memory_state() -> AppState {
    create_memory_app_state(TEST_SECRET, None)
        .expect("Could not create app state.")
        .with_password_cost(TEST_PASSWORD_COST)
}

pub(crate) fn get_test_sqlite_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    create_app_state(connection, TEST_SECRET, None)
        .expect("Could not create app state.")
        .with_password_cost(TEST_PASSWORD_COST)
}

pub(crate) fn get_test_auth_state(user_store: impl UserStore + 'static) -> AuthState {
    AuthState {
        user_store: Arc::new(user_store),
        token_keys: TokenKeys::new(TEST_SECRET).expect("Could not create token keys."),
        demo_password: None,
        password_cost: TEST_PASSWORD_COST,
    }
}

/// A store whose every operation fails, as if the database were unreachable.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FailingStore;

impl UserStore for FailingStore {
    fn create(&self, _: Username, _: PasswordHash) -> Result<User, Error> {
        Err(Error::DatabaseLockError)
    }

    fn get(&self, _: UserID) -> Result<User, Error> {
        Err(Error::DatabaseLockError)
    }

    fn get_by_username(&self, _: &Username) -> Result<User, Error> {
        Err(Error::DatabaseLockError)
    }
}

impl TransactionStore for FailingStore {
    fn create(&self, _: UserID, _: NewTransaction) -> Result<Transaction, Error> {
        Err(Error::DatabaseLockError)
    }

    fn get(&self, _: UserID, _: TransactionId) -> Result<Transaction, Error> {
        Err(Error::DatabaseLockError)
    }

    fn list(&self, _: UserID) -> Result<Vec<Transaction>, Error> {
        Err(Error::DatabaseLockError)
    }

    fn update(&self, _: UserID, _: TransactionId, _: TransactionUpdate) -> Result<Transaction, Error> {
        Err(Error::DatabaseLockError)
    }

    fn delete(&self, _: UserID, _: TransactionId) -> Result<(), Error> {
        Err(Error::DatabaseLockError)
    }

    fn delete_many(&self, _: UserID, _: &[TransactionId]) -> Result<usize, Error> {
        Err(Error::DatabaseLockError)
    }

    fn balance(&self, _: UserID) -> Result<Balance, Error> {
        Err(Error::DatabaseLockError)
    }
}
