//! Log in as the shared demo account without a password.

use axum::extract::State;

use crate::{
    AppJson, Error, PasswordHash, User, UserID, UserStore, Username,
    app_state::AuthState,
    auth::{TokenResponse, encode_token},
    password::generate_random_password,
};

/// The username of the demo account.
pub const DEMO_USERNAME: &str = "demo";

/// The identity used for demo tokens when the user store cannot be reached.
///
/// Stores never assign the ID 0 to a user.
pub const DEMO_FALLBACK_USER_ID: UserID = UserID::new(0);

const RANDOM_PASSWORD_LENGTH: usize = 32;

/// Get the demo user, creating it if it does not exist yet.
///
/// The demo user is given `demo_password`, or a random password if `None`.
pub fn ensure_demo_user(
    user_store: &dyn UserStore,
    demo_password: Option<&str>,
    password_cost: u32,
) -> Result<User, Error> {
    let username = Username::new_unchecked(DEMO_USERNAME);

    match user_store.get_by_username(&username) {
        Ok(user) => return Ok(user),
        Err(Error::NotFound) => {}
        Err(error) => return Err(error),
    }

    let password = match demo_password {
        Some(password) => password.to_owned(),
        None => generate_random_password(RANDOM_PASSWORD_LENGTH),
    };
    let password_hash = PasswordHash::new(&password, password_cost)?;

    match user_store.create(username.clone(), password_hash) {
        Ok(user) => {
            tracing::info!("Created the demo user with ID {}", user.id);
            Ok(user)
        }
        // Another request created the demo user in the meantime.
        Err(Error::DuplicateUsername) => user_store.get_by_username(&username),
        Err(error) => Err(error),
    }
}

/// Handler for demo log-in requests.
///
/// Always issues a token. If the demo user cannot be fetched or created, the
/// error is logged and the token is issued for [DEMO_FALLBACK_USER_ID].
pub async fn demo_log_in(State(state): State<AuthState>) -> Result<AppJson<TokenResponse>, Error> {
    let id = match ensure_demo_user(
        state.user_store.as_ref(),
        state.demo_password.as_deref(),
        state.password_cost,
    ) {
        Ok(user) => user.id,
        Err(error) => {
            tracing::error!("Could not get or create the demo user, using the fallback ID: {error}");
            DEMO_FALLBACK_USER_ID
        }
    };

    let token = encode_token(id, DEMO_USERNAME, &state.token_keys)?;

    Ok(AppJson(TokenResponse {
        token,
        username: DEMO_USERNAME.to_owned(),
    }))
}
