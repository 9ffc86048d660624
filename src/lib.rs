//! Money Tracker is a backend for tracking personal income and expenses.
//!
//! This library provides a JSON REST API with user accounts, token based
//! authentication, and per-user transaction records. Users and transactions
//! are kept either in SQLite or in memory, see [stores].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod endpoints;
mod error;
mod json;
mod logging;
mod password;
mod routing;
pub mod stores;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, AuthState, TransactionState};
pub use auth::{
    Claims, Credentials, DEMO_FALLBACK_USER_ID, DEMO_USERNAME, TOKEN_DURATION, TokenKeys,
    TokenResponse, decode_token, encode_token, ensure_demo_user,
};
pub use endpoints::format_endpoint;
pub use error::Error;
pub use json::AppJson;
pub use logging::{LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware};
pub use password::{PasswordHash, generate_random_password};
pub use routing::build_router;
pub use transaction::{
    Balance, NewTransaction, Transaction, TransactionDateTime, TransactionId, TransactionStore,
    TransactionUpdate,
};
pub use user::{User, UserID, UserStore, Username};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
