//! Signed-in user slice.

use serde::{Deserialize, Serialize};

/// The authenticated user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account email.
    pub email: String,
    /// JWT for authenticated requests.
    pub token: String,
    /// Unique username.
    pub username: String,
    /// Short biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// Session slice: who is signed in, if anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserState {
    /// Current user.
    pub user: Option<User>,
}

impl UserState {
    /// Username of the signed-in user.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}
