//! Defines the app level error type and its conversion into JSON error responses.
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
///
/// Client errors (4xx) are reported to the client with their display string.
/// Server errors (5xx) are logged and replaced with a generic message so that
/// no internal details leak to the client.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body was larger than
    /// [REQUEST_BODY_LIMIT](crate::REQUEST_BODY_LIMIT).
    #[error("Request body too large")]
    PayloadTooLarge,

    /// The username or password was missing or empty in a registration or
    /// log-in request.
    #[error("Username and password are required")]
    MissingCredentials,

    /// A transaction request was missing one of the required fields `name`,
    /// `datetime` or `price`.
    #[error("Missing required fields")]
    MissingFields,

    /// A field was present but could not be parsed.
    ///
    /// The string describes which field was invalid and why.
    #[error("{0}")]
    InvalidField(String),

    /// The list of IDs for a bulk delete was missing, empty or not a list.
    #[error("Invalid or empty array of IDs")]
    InvalidIds,

    /// The request body could not be parsed as JSON of the expected shape.
    #[error("Invalid request body: {0}")]
    InvalidJson(String),

    /// The username does not belong to a registered user or the password did
    /// not match.
    ///
    /// The same error is used for both cases so that clients cannot probe for
    /// registered usernames.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The request did not include a bearer token.
    #[error("Access token missing")]
    MissingToken,

    /// The bearer token was malformed, signed with another key or expired.
    #[error("Invalid access token")]
    InvalidToken,

    /// The username used to register is already taken. The client should try
    /// again with a different username.
    #[error("Username already taken")]
    DuplicateUsername,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Not found")]
    NotFound,

    /// Tried to update a transaction that does not exist or belongs to
    /// another user.
    #[error("Transaction not found")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist or belongs to
    /// another user.
    #[error("Transaction not found")]
    DeleteMissingTransaction,

    /// A bulk delete matched none of the requester's transactions.
    #[error("No transactions found")]
    NoTransactionsDeleted,

    /// The server was configured with an empty secret for signing tokens.
    #[error("the JWT secret must not be empty")]
    EmptySecret,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An unexpected error occurred while signing a token.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// A transaction was written for an owner that does not exist.
    #[error("the owner of the transaction does not exist")]
    InvalidForeignKey,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl Error {
    /// The HTTP status code used when this error is sent to a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingCredentials
            | Error::MissingFields
            | Error::InvalidField(_)
            | Error::InvalidIds
            | Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials | Error::MissingToken => StatusCode::UNAUTHORIZED,
            Error::InvalidToken => StatusCode::FORBIDDEN,
            Error::DuplicateUsername => StatusCode::CONFLICT,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::NoTransactionsDeleted => StatusCode::NOT_FOUND,
            Error::EmptySecret
            | Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::InvalidForeignKey
            | Error::SqlError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.username") =>
            {
                Error::DuplicateUsername
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                Error::InvalidForeignKey
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidJson(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            // Any errors that are not client errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred".to_owned()
        } else {
            self.to_string()
        };

        (status, axum::Json(json!({ "message": message }))).into_response()
    }
}
