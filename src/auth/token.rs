//! Issuing and verifying the signed tokens that identify a user.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, UserID};

/// How long a token is valid for after it is issued.
pub const TOKEN_DURATION: Duration = Duration::hours(1);

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub id: UserID,
    /// The username of the user the token was issued to.
    pub username: String,
    /// When the token was issued, as a Unix timestamp in seconds.
    pub iat: i64,
    /// When the token expires, as a Unix timestamp in seconds.
    pub exp: i64,
}

impl Claims {
    /// Create claims for a token issued at `issued_at` that expires
    /// [TOKEN_DURATION] later.
    pub fn new(id: UserID, username: &str, issued_at: OffsetDateTime) -> Self {
        Self {
            id,
            username: username.to_owned(),
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + TOKEN_DURATION).unix_timestamp(),
        }
    }
}

/// The keys for signing and verifying tokens, derived from one secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    /// Derive the keys from `secret`.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptySecret] if `secret` is empty or only whitespace.
    pub fn new(secret: &str) -> Result<Self, Error> {
        if secret.trim().is_empty() {
            return Err(Error::EmptySecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
    }
}

/// Issue a token for the user with `id` and `username`, valid from now.
pub fn encode_token(id: UserID, username: &str, keys: &TokenKeys) -> Result<String, Error> {
    encode_claims(&Claims::new(id, username, OffsetDateTime::now_utc()), keys)
}

/// Sign `claims` as is.
pub fn encode_claims(claims: &Claims, keys: &TokenKeys) -> Result<String, Error> {
    encode(&Header::default(), claims, &keys.encoding)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Verify `token` and return its claims.
///
/// # Errors
///
/// Returns [Error::InvalidToken] if the token is malformed, was signed with
/// another secret or has expired.
pub fn decode_token(token: &str, keys: &TokenKeys) -> Result<Claims, Error> {
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|error| {
            tracing::debug!("Rejected token: {error}");
            Error::InvalidToken
        })
}
