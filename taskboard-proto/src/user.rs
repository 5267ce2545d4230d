//! User records and request bodies for the `/user/` endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum allowed full-name length in characters.
pub const MAX_NAME_LENGTH: usize = 30;

/// Maximum allowed email length in characters.
pub const MAX_EMAIL_LENGTH: usize = 50;

/// Server-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    pub id: UserId,
    /// Title-cased full name.
    pub name: String,
    /// Lower-cased email address.
    pub email: String,
    /// Masked phone number, if the user gave one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Entry of the user selector (`GET /user/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Server-assigned identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

/// Body of `POST /user/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Normalized full name.
    pub name: String,
    /// Normalized email address.
    pub email: String,
    /// Masked phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
