//! Local user session types

use serde::{Deserialize, Serialize};

/// The user logged in on this client, as returned by the login endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    /// Server-side user id
    #[serde(default)]
    pub id: Option<i64>,
    /// Login name
    #[serde(default)]
    pub login_name: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Session token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl LocalUser {
    /// Creates a user holding `token`.
    #[must_use]
    pub fn with_token(login_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            login_name: login_name.into(),
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Returns the token if it is present and non-empty.
    #[must_use]
    pub fn active_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| is_not_empty(Some(t)))
    }
}

/// Returns true unless `value` is absent or blank.
///
/// A value made only of whitespace is blank.
#[must_use]
pub fn is_not_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
