//! Remote API abstraction.
//!
//! The feed and the authorization form talk to the server only through
//! the [`ArticleApi`] and [`AuthApi`] traits. [`HttpClient`] implements
//! both against a RealWorld-compatible backend.

mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::HttpClient;

use crate::article::{Article, ArticleList};
use crate::filter::Filter;
use crate::page::Page;
use crate::store::User;

/// Error key the server uses when sign-in credentials do not match.
pub const INVALID_CREDENTIALS_KEY: &str = "email or password";

/// Field-keyed error messages from a rejected request.
///
/// The server answers 422 with `{"errors": {"email": ["is invalid"]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerErrors(BTreeMap<String, Vec<String>>);

impl ServerErrors {
    /// Build from `(field, message)` pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut errors = BTreeMap::<String, Vec<String>>::new();
        for (field, message) in pairs {
            errors.entry(field.into()).or_default().push(message.into());
        }
        Self(errors)
    }

    /// Check if the given key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Check if there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One `"field message"` line per message.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |message| format!("{field} {message}"))
            })
            .collect()
    }
}

impl std::fmt::Display for ServerErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

/// Errors reported by the remote API layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never got an HTTP answer.
    #[error("network error: {0}")]
    Network(String),

    /// Credentials missing or rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// The resource does not exist.
    #[error("not found")]
    NotFound,

    /// The server rejected the request body.
    #[error("request rejected: {0}")]
    Unprocessable(ServerErrors),

    /// Any other non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// A mutation was requested without an article slug.
    #[error("article slug is empty")]
    InvalidSlug,
}

impl ApiError {
    /// Check if the server rejected the credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Server errors attached to a rejected request.
    #[must_use]
    pub fn server_errors(&self) -> Option<&ServerErrors> {
        match self {
            Self::Unprocessable(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type for API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Parameters of one list request. Also the cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticleQuery {
    /// Requested page.
    pub page: Page,
    /// Server-side scoping.
    pub filter: Filter,
}

impl ArticleQuery {
    /// Create a query for the given page and filter.
    #[must_use]
    pub fn new(page: Page, filter: Filter) -> Self {
        Self { page, filter }
    }
}

/// Article endpoints.
#[async_trait::async_trait]
pub trait ArticleApi: Send + Sync {
    /// Fetch one page of articles.
    async fn fetch_articles(&self, query: &ArticleQuery) -> ApiResult<ArticleList>;

    /// Favorite an article, returning its updated state.
    async fn add_favorite(&self, slug: &str) -> ApiResult<Article>;

    /// Unfavorite an article, returning its updated state.
    async fn remove_favorite(&self, slug: &str) -> ApiResult<Article>;
}

/// Account endpoints.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a signed-in user.
    async fn login(&self, email: &str, password: &str) -> ApiResult<User>;

    /// Create an account and sign in.
    async fn register(&self, username: &str, email: &str, password: &str) -> ApiResult<User>;

    /// The user the configured token belongs to.
    async fn current_user(&self) -> ApiResult<User>;
}
