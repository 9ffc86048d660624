//! The handler for registering new users.

use axum::{extract::State, http::StatusCode};

use crate::{
    AppJson, Error, PasswordHash,
    app_state::AuthState,
    auth::{Credentials, TokenResponse, encode_token},
};

/// Handler for registration requests.
///
/// Creates the user and responds with 201 and a token, so the client is
/// logged in straight away.
///
/// # Errors
///
/// Returns [Error::MissingCredentials] if the username or password is missing,
/// or [Error::DuplicateUsername] if the username is taken.
pub async fn register_user(
    State(state): State<AuthState>,
    AppJson(credentials): AppJson<Credentials>,
) -> Result<(StatusCode, AppJson<TokenResponse>), Error> {
    let (username, password) = credentials.validate()?;

    match state.user_store.get_by_username(&username) {
        Ok(_) => return Err(Error::DuplicateUsername),
        Err(Error::NotFound) => {}
        Err(error) => return Err(error),
    }

    let password_hash = PasswordHash::new(&password, state.password_cost)?;
    let user = state.user_store.create(username, password_hash)?;

    tracing::info!("Registered user {} with ID {}", user.username, user.id);

    let token = encode_token(user.id, user.username.as_ref(), &state.token_keys)?;

    Ok((
        StatusCode::CREATED,
        AppJson(TokenResponse {
            token,
            username: user.username.to_string(),
        }),
    ))
}
