//! `conduit` - Article feed and authorization client for RealWorld APIs
//!
//! This library keeps a paginated, route-filtered article feed in sync with
//! the URL and a remote API, toggles favorites with typed failures and
//! validates the sign-in and sign-up form.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod article;
pub mod auth_form;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod filter;
pub mod location;
pub mod logging;
pub mod page;
pub mod route;
pub mod store;

pub use api::{ApiError, ArticleApi, AuthApi, HttpClient};
pub use article::{Article, ArticleList, FavoriteDirection};
pub use auth_form::AuthorizationForm;
pub use config::Config;
pub use error::{Error, MutationError, Result};
pub use feed::{Feed, FeedController, FeedView};
pub use filter::Filter;
pub use location::Location;
pub use logging::init_logging;
pub use page::Page;
pub use route::Route;
pub use store::Store;
