//! Defines the user model and the trait for stores that persist users.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The name a user registers and logs in with.
///
/// Usernames are trimmed of surrounding whitespace and must not be empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a username from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingCredentials] if the trimmed string is empty.
    pub fn new(raw_username: &str) -> Result<Self, Error> {
        let trimmed = raw_username.trim();

        if trimmed.is_empty() {
            Err(Error::MissingCredentials)
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    /// Create a username without any validation.
    ///
    /// The caller should ensure the string is trimmed and not empty, e.g. when
    /// it has been read back from a store.
    pub fn new_unchecked(raw_username: &str) -> Self {
        Self(raw_username.to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// The caller should ensure that `id` and `username` are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application store.
    pub id: UserID,
    /// The name the user logs in with.
    pub username: Username,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Handles the creation and retrieval of [User] objects.
pub trait UserStore: Send + Sync {
    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateUsername] if `username` is already taken.
    fn create(&self, username: Username, password_hash: PasswordHash) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get a user by their username.
    ///
    /// Returns [Error::NotFound] if no user with the given username exists.
    fn get_by_username(&self, username: &Username) -> Result<User, Error>;
}
