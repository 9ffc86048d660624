//! Implements the struct that holds the state of the REST server and the
//! smaller states that each group of route handlers needs.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{Error, PasswordHash, TransactionStore, UserStore, auth::TokenKeys};

/// The state of the REST server.
///
/// Stores are held as trait objects so the backend can be chosen at start-up.
#[derive(Clone)]
pub struct AppState {
    /// The store for user accounts.
    pub user_store: Arc<dyn UserStore>,

    /// The store for transactions.
    pub transaction_store: Arc<dyn TransactionStore>,

    /// The keys for signing and verifying tokens.
    pub token_keys: TokenKeys,

    /// The password for the demo account. A random password is used when this
    /// is `None`.
    pub demo_password: Option<String>,

    /// The bcrypt cost for hashing new passwords.
    pub password_cost: u32,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptySecret] if `jwt_secret` is empty.
    pub fn new(
        user_store: Arc<dyn UserStore>,
        transaction_store: Arc<dyn TransactionStore>,
        jwt_secret: &str,
        demo_password: Option<String>,
    ) -> Result<Self, Error> {
        Ok(Self {
            user_store,
            transaction_store,
            token_keys: TokenKeys::new(jwt_secret)?,
            demo_password,
            password_cost: PasswordHash::DEFAULT_COST,
        })
    }

    /// Use `cost` for hashing new passwords instead of the default.
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }
}

/// The state needed to register users and log them in.
#[derive(Clone)]
pub struct AuthState {
    /// The store for user accounts.
    pub user_store: Arc<dyn UserStore>,
    /// The keys for signing tokens.
    pub token_keys: TokenKeys,
    /// The password for the demo account.
    pub demo_password: Option<String>,
    /// The bcrypt cost for hashing new passwords.
    pub password_cost: u32,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            user_store: state.user_store.clone(),
            token_keys: state.token_keys.clone(),
            demo_password: state.demo_password.clone(),
            password_cost: state.password_cost,
        }
    }
}

/// The state needed to manage transactions.
#[derive(Clone)]
pub struct TransactionState {
    /// The store for transactions.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        state.token_keys.clone()
    }
}
