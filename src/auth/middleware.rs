//! Authentication middleware that checks the bearer token on protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    Error,
    auth::{TokenKeys, decode_token},
};

/// Middleware function that checks for a valid bearer token.
///
/// The token's [Claims](crate::auth::Claims) are placed into the request and
/// the request executed normally if the token is valid. Otherwise the request
/// is rejected with [Error::MissingToken] (401) if there is no `Authorization`
/// header, or [Error::InvalidToken] (403) if the header or token is invalid.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(claims): Extension<Claims>` to receive the caller's identity.
pub async fn auth_guard(State(keys): State<TokenKeys>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let bearer =
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(&mut parts, &()).await {
            Ok(TypedHeader(Authorization(bearer))) => bearer,
            Err(rejection) if rejection.is_missing() => return Error::MissingToken.into_response(),
            Err(rejection) => {
                tracing::debug!("Rejected authorization header: {rejection}");
                return Error::InvalidToken.into_response();
            }
        };

    let claims = match decode_token(bearer.token(), &keys) {
        Ok(claims) => claims,
        Err(error) => return error.into_response(),
    };

    parts.extensions.insert(claims);
    next.run(Request::from_parts(parts, body)).await
}
