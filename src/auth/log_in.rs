//! Handlers and types for logging in with a username and password.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::{
    AppJson, Error, Username,
    app_state::AuthState,
    auth::encode_token,
};

/// The body of a register or log-in request.
///
/// Fields are optional so that a missing field is reported as
/// [Error::MissingCredentials] rather than as a JSON parse error.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Credentials {
    /// The name of the user.
    #[serde(default)]
    pub username: Option<String>,
    /// The user's password in plain text.
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    /// Check that both fields are present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingCredentials] if either field is missing or empty.
    pub fn validate(self) -> Result<(Username, String), Error> {
        let username = Username::new(self.username.as_deref().unwrap_or_default())?;

        match self.password {
            Some(password) if !password.is_empty() => Ok((username, password)),
            _ => Err(Error::MissingCredentials),
        }
    }
}

/// The response to a successful register or log-in request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// A signed token to send as `Authorization: Bearer <token>`.
    pub token: String,
    /// The name of the user the token was issued to.
    pub username: String,
}

/// Handler for log-in requests.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The username or password is missing or empty.
/// - The username does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password.
pub async fn log_in(
    State(state): State<AuthState>,
    AppJson(credentials): AppJson<Credentials>,
) -> Result<AppJson<TokenResponse>, Error> {
    let (username, password) = credentials.validate()?;

    let user = state
        .user_store
        .get_by_username(&username)
        .map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?;

    let is_password_correct = user.password_hash.verify(&password).map_err(|error| {
        tracing::error!("Error verifying password for {}: {error}", user.username);
        Error::HashingError(error.to_string())
    })?;

    if !is_password_correct {
        return Err(Error::InvalidCredentials);
    }

    tracing::info!("User {} logged in", user.id);

    let token = encode_token(user.id, user.username.as_ref(), &state.token_keys)?;

    Ok(AppJson(TokenResponse {
        token,
        username: user.username.to_string(),
    }))
}
