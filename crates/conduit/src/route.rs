//! Application routes.

use serde::{Deserialize, Serialize};

/// Path of the public article feed.
pub const HOME_PATH: &str = "/";
/// Path of the current user's own articles.
pub const USER_ARTICLES_PATH: &str = "/user/articles";
/// Path of the articles the current user has favorited.
pub const USER_FAVORITES_PATH: &str = "/user/articles/favorite";
/// Sign-in page.
pub const LOGIN_PATH: &str = "/login";
/// Sign-up page.
pub const REGISTER_PATH: &str = "/register";
/// Sign-out action.
pub const LOGOUT_PATH: &str = "/logout";

/// A known location in the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// The public feed.
    Home,
    /// Articles written by the current user.
    UserArticles,
    /// Articles favorited by the current user.
    UserFavorites,
    /// Sign-in form.
    Login,
    /// Sign-up form.
    Register,
    /// Sign-out.
    Logout,
    /// Any other path, kept verbatim.
    Other(String),
}

impl Route {
    /// Parse a route from a URL path. Trailing slashes are ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            USER_ARTICLES_PATH => Self::UserArticles,
            USER_FAVORITES_PATH => Self::UserFavorites,
            LOGIN_PATH => Self::Login,
            REGISTER_PATH => Self::Register,
            LOGOUT_PATH => Self::Logout,
            other => Self::Other(other.to_string()),
        }
    }

    /// The canonical path for this route.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Home => HOME_PATH,
            Self::UserArticles => USER_ARTICLES_PATH,
            Self::UserFavorites => USER_FAVORITES_PATH,
            Self::Login => LOGIN_PATH,
            Self::Register => REGISTER_PATH,
            Self::Logout => LOGOUT_PATH,
            Self::Other(path) => path,
        }
    }

    /// Whether arriving from this route means the session just changed.
    #[must_use]
    pub fn is_auth_action(&self) -> bool {
        matches!(self, Self::Login | Self::Register | Self::Logout)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
