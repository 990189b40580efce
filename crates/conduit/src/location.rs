//! Router-facing location: path, query string and transient navigation state.
//!
//! The query string carries the `page` parameter. Navigation state is a
//! one-shot channel: each value can be taken exactly once.

use url::form_urlencoded;
use url::Url;

use crate::error::{Error, Result};
use crate::page::Page;
use crate::route::Route;

/// Name of the page parameter in the query string.
pub const PAGE_PARAM: &str = "page";

/// Base used to resolve relative hrefs; never leaves this module.
const LOCAL_ORIGIN: &str = "http://localhost";

/// Parsed query string, preserving parameter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlQuery {
    pairs: Vec<(String, String)>,
}

impl UrlQuery {
    /// Parse a query string, with or without the leading `?`.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// Raw value of a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The page requested by the URL. Absent or malformed values yield `None`.
    #[must_use]
    pub fn page(&self) -> Option<Page> {
        self.get(PAGE_PARAM).and_then(|raw| raw.parse().ok())
    }

    /// Replace the page parameter, keeping every other parameter.
    pub fn set_page(&mut self, page: Page) {
        self.remove_page();
        self.pairs.push((PAGE_PARAM.to_string(), page.to_string()));
    }

    /// Drop the page parameter.
    pub fn remove_page(&mut self) {
        self.pairs.retain(|(key, _)| key != PAGE_PARAM);
    }

    /// Check if the query carries no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode back into a query string without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

/// Transient state a navigation may carry.
///
/// Every field can be read once; reading clears it so a later render
/// never applies it again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    from: Option<Route>,
    articles_page: Option<Page>,
}

impl NavigationState {
    /// State recording the route the user came from.
    #[must_use]
    pub fn from_route(route: Route) -> Self {
        Self {
            from: Some(route),
            articles_page: None,
        }
    }

    /// State carrying a one-shot page override.
    #[must_use]
    pub fn with_articles_page(page: Page) -> Self {
        Self {
            from: None,
            articles_page: Some(page),
        }
    }

    /// Take the route the navigation came from.
    pub fn take_from(&mut self) -> Option<Route> {
        self.from.take()
    }

    /// Take the page override.
    pub fn take_articles_page(&mut self) -> Option<Page> {
        self.articles_page.take()
    }

    /// Check if nothing is left to consume.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.articles_page.is_none()
    }
}

/// The current location as the router reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Matched route.
    pub route: Route,
    /// Query string.
    pub query: UrlQuery,
    /// One-shot navigation state.
    pub state: NavigationState,
}

impl Location {
    /// A location for the given route with no query or state.
    #[must_use]
    pub fn new(route: Route) -> Self {
        Self {
            route,
            query: UrlQuery::default(),
            state: NavigationState::default(),
        }
    }

    /// Parse an href such as `/user/articles?page=2`.
    ///
    /// # Errors
    ///
    /// Returns an error if the href cannot be parsed as a URL reference.
    pub fn parse(href: &str) -> Result<Self> {
        let base = Url::parse(LOCAL_ORIGIN).map_err(|e| Error::internal(e.to_string()))?;
        let url = base
            .join(href)
            .map_err(|e| Error::internal(format!("invalid location '{href}': {e}")))?;

        Ok(Self {
            route: Route::from_path(url.path()),
            query: UrlQuery::parse(url.query().unwrap_or_default()),
            state: NavigationState::default(),
        })
    }

    /// Attach navigation state, as a router does on `navigate(to, { state })`.
    #[must_use]
    pub fn with_state(mut self, state: NavigationState) -> Self {
        self.state = state;
        self
    }

    /// Path plus query string.
    #[must_use]
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            self.route.path().to_string()
        } else {
            format!("{}?{}", self.route.path(), self.query.to_query_string())
        }
    }
}
