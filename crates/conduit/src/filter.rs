//! Server-side scoping of the article list.

use serde::{Deserialize, Serialize};

use crate::route::Route;

/// Which query parameter scopes the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterQuery {
    /// Unscoped.
    None,
    /// Articles written by a user.
    Author,
    /// Articles favorited by a user.
    Favorited,
}

impl FilterQuery {
    /// Query-string parameter name, if any.
    #[must_use]
    pub fn param_name(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Author => Some("author"),
            Self::Favorited => Some("favorited"),
        }
    }
}

/// Scoping applied to the list request, derived from the current route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "query", content = "params", rename_all = "snake_case")]
pub enum Filter {
    /// No scoping.
    #[default]
    None,
    /// Only articles by this username.
    Author(String),
    /// Only articles favorited by this username.
    Favorited(String),
}

impl Filter {
    /// The query kind.
    #[must_use]
    pub fn query(&self) -> FilterQuery {
        match self {
            Self::None => FilterQuery::None,
            Self::Author(_) => FilterQuery::Author,
            Self::Favorited(_) => FilterQuery::Favorited,
        }
    }

    /// The query argument; empty for an unscoped filter.
    #[must_use]
    pub fn params(&self) -> &str {
        match self {
            Self::None => "",
            Self::Author(username) | Self::Favorited(username) => username,
        }
    }

    /// Query-string pair to append to the list request.
    #[must_use]
    pub fn query_pair(&self) -> Option<(&'static str, &str)> {
        self.query().param_name().map(|name| (name, self.params()))
    }
}

/// Map the current route and user to the list filter.
///
/// User-scoped routes need a username; without one the list is unscoped.
#[must_use]
pub fn derive_filter(route: &Route, username: Option<&str>) -> Filter {
    match (route, username) {
        (Route::UserArticles, Some(name)) => Filter::Author(name.to_string()),
        (Route::UserFavorites, Some(name)) => Filter::Favorited(name.to_string()),
        _ => Filter::None,
    }
}
