//! Error types for conduit.
//!
//! This module defines the crate-level error type along with the typed
//! failure returned by favorite mutations, so callers decide whether to
//! ignore, log or surface it.

use thiserror::Error;

use crate::api::ApiError;
use crate::article::FavoriteDirection;

/// The main error type for conduit operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === API Errors ===
    /// A request against the remote API failed.
    #[error("API request failed: {0}")]
    Api(#[from] ApiError),

    /// A favorite toggle failed.
    #[error(transparent)]
    Mutation(#[from] MutationError),

    // === Input Errors ===
    /// A page number was not a positive integer.
    #[error("invalid page number: {value}")]
    InvalidPage {
        /// The rejected input.
        value: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for conduit operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create an invalid page error from the rejected input.
    #[must_use]
    pub fn invalid_page(value: impl ToString) -> Self {
        Self::InvalidPage {
            value: value.to_string(),
        }
    }
}

/// A favorite add/remove that did not apply.
///
/// No local article state is patched before the server answers, so a
/// failed mutation leaves the feed exactly as it was.
#[derive(Error, Debug)]
#[error("failed to {direction} favorite for '{slug}': {source}")]
pub struct MutationError {
    /// Slug of the targeted article.
    pub slug: String,
    /// Whether the favorite was being added or removed.
    pub direction: FavoriteDirection,
    /// What the API reported.
    #[source]
    pub source: ApiError,
}

impl MutationError {
    /// Create a mutation error for the given slug and direction.
    #[must_use]
    pub fn new(slug: impl Into<String>, direction: FavoriteDirection, source: ApiError) -> Self {
        Self {
            slug: slug.into(),
            direction,
            source,
        }
    }
}
