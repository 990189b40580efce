//! Article feed synchronization.
//!
//! [`FeedController`] reconciles three sources of state on every render:
//! the stored page, the URL `page` parameter and the route-derived filter.
//! It decides when a list fetch must go out and which response may be
//! shown. It performs no I/O itself; [`Feed`] pairs it with an
//! [`ArticleApi`](crate::api::ArticleApi).
//!
//! Requests are identified by [`FetchTicket`]s. Only the most recently
//! issued ticket can commit a result, so responses that arrive out of
//! order for superseded parameters are dropped rather than rendered.

mod driver;
mod view;

use std::time::Duration;

use tracing::{debug, trace};

pub use driver::Feed;
pub use view::{ArticleCard, FeedView, Pagination, EMPTY_FEED_MESSAGE};

use crate::api::{ApiError, ApiResult, ArticleQuery};
use crate::article::{Article, ArticleList, FavoriteDirection};
use crate::cache::QueryCache;
use crate::config::Config;
use crate::error::MutationError;
use crate::filter::{derive_filter, Filter};
use crate::location::Location;
use crate::page::{page_count, resolve_effective_page, Page};
use crate::route::Route;
use crate::store::{Action, Store};

/// Side effects the view layer should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEffect {
    /// Scroll the list back to the top.
    ScrollToTop,
}

/// Handle for one outstanding list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    generation: u64,
    query: ArticleQuery,
}

impl FetchTicket {
    /// Parameters to send to the server.
    #[must_use]
    pub fn query(&self) -> &ArticleQuery {
        &self.query
    }
}

/// What happened to a resolved request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The response is now what the feed shows.
    Committed,
    /// A newer request superseded this one; the response was dropped.
    Stale,
}

/// A favorite toggle between dispatch and completion.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a started mutation must be finished to clear the loading state"]
pub struct FavoriteMutation {
    slug: String,
    direction: FavoriteDirection,
}

impl FavoriteMutation {
    /// Targeted article.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Add or remove.
    #[must_use]
    pub fn direction(&self) -> FavoriteDirection {
        self.direction
    }
}

#[derive(Debug, Clone)]
enum Outcome {
    Loaded(ArticleList),
    Failed(ApiError),
}

#[derive(Debug, Clone)]
struct Committed {
    query: ArticleQuery,
    outcome: Outcome,
}

/// State machine behind the article feed.
#[derive(Debug)]
pub struct FeedController {
    limit: u32,
    cache: QueryCache,
    filter: Filter,
    current: Option<ArticleQuery>,
    force_refetch: bool,
    next_seq: u64,
    in_flight: Option<FetchTicket>,
    committed: Option<Committed>,
    pending_mutations: usize,
    effects: Vec<ViewEffect>,
}

impl FeedController {
    /// Create a controller showing `limit` articles per page.
    #[must_use]
    pub fn new(limit: u32, cache_ttl: Duration) -> Self {
        Self {
            limit,
            cache: QueryCache::new(cache_ttl),
            filter: Filter::None,
            current: None,
            force_refetch: false,
            next_seq: 0,
            in_flight: None,
            committed: None,
            pending_mutations: 0,
            effects: Vec::new(),
        }
    }

    /// Create a controller from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.feed.articles_limit, config.cache_ttl())
    }

    /// Filter derived on the last render.
    #[must_use]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// True while a list fetch or a favorite mutation is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some() || self.pending_mutations > 0
    }

    /// Run one render pass.
    ///
    /// Consumes the one-shot navigation state, recomputes the filter and
    /// the effective page, and returns a ticket when a fetch must be sent.
    pub fn on_render(&mut self, store: &mut Store, location: &mut Location) -> Option<FetchTicket> {
        let filter = derive_filter(&location.route, store.username());
        if filter != self.filter {
            debug!(?filter, "feed filter changed");
            self.filter = filter;
        }

        self.on_explicit_page_override(store, location);

        if let Some(from) = location.state.take_from() {
            self.on_navigation_from(&from);
        }

        let page = resolve_effective_page(store.page(), location.query.page());
        let query = ArticleQuery::new(page, self.filter.clone());
        self.current = Some(query.clone());
        self.request(query)
    }

    /// Apply a page carried by navigation state, exactly once.
    ///
    /// The router replaces the location with its bare path when it consumes
    /// the override, so a stale `page` parameter cannot shadow it.
    pub fn on_explicit_page_override(&mut self, store: &mut Store, location: &mut Location) {
        if let Some(page) = location.state.take_articles_page() {
            debug!(%page, "applying navigation page override");
            store.dispatch(Action::SetPage(page));
            location.query.remove_page();
        }
    }

    /// Force a re-fetch when arriving from a sign-in, sign-up or sign-out.
    pub fn on_navigation_from(&mut self, previous: &Route) {
        if previous.is_auth_action() {
            debug!(from = %previous, "session changed, forcing re-fetch");
            self.force_refetch = true;
        }
    }

    /// Re-fetch the current query on the next render, ignoring the cache.
    pub fn refetch(&mut self) {
        self.force_refetch = true;
    }

    /// Move to `page` from the pagination control.
    ///
    /// Store and URL agree as soon as this returns.
    pub fn on_paginate(&mut self, store: &mut Store, location: &mut Location, page: Page) {
        store.dispatch(Action::SetPage(page));
        location.query.set_page(page);
        self.effects.push(ViewEffect::ScrollToTop);
    }

    /// Drain pending view effects.
    pub fn take_effects(&mut self) -> Vec<ViewEffect> {
        std::mem::take(&mut self.effects)
    }

    fn request(&mut self, query: ArticleQuery) -> Option<FetchTicket> {
        if std::mem::take(&mut self.force_refetch) {
            return Some(self.issue(query));
        }

        if self.in_flight.as_ref().is_some_and(|t| t.query == query) {
            trace!(?query, "request already in flight");
            return None;
        }

        if let Some(list) = self.cache.get_fresh(&query) {
            trace!(?query, "serving list from cache");
            self.committed = Some(Committed {
                query,
                outcome: Outcome::Loaded(list.clone()),
            });
            // Anything still in flight is for other parameters now
            self.in_flight = None;
            return None;
        }

        // A failed query is retried only on explicit refetch or a new key
        let failed_here = self
            .committed
            .as_ref()
            .is_some_and(|c| c.query == query && matches!(c.outcome, Outcome::Failed(_)));
        if failed_here && self.in_flight.is_none() {
            return None;
        }

        Some(self.issue(query))
    }

    fn issue(&mut self, query: ArticleQuery) -> FetchTicket {
        self.next_seq += 1;
        let ticket = FetchTicket {
            seq: self.next_seq,
            generation: self.cache.generation(),
            query,
        };
        debug!(seq = ticket.seq, query = ?ticket.query, "issuing list fetch");
        self.in_flight = Some(ticket.clone());
        ticket
    }

    /// Deliver the response for `ticket`.
    pub fn resolve(&mut self, ticket: FetchTicket, result: ApiResult<ArticleList>) -> Resolution {
        if let Ok(list) = &result {
            self.cache
                .insert(ticket.query.clone(), list.clone(), ticket.generation);
        }

        let is_latest = self.in_flight.as_ref().is_some_and(|t| t.seq == ticket.seq);
        if !is_latest {
            debug!(seq = ticket.seq, "dropping stale list response");
            return Resolution::Stale;
        }

        self.in_flight = None;
        let outcome = match result {
            Ok(list) => Outcome::Loaded(list),
            Err(err) => {
                debug!(%err, "list fetch failed");
                Outcome::Failed(err)
            }
        };
        self.committed = Some(Committed {
            query: ticket.query,
            outcome,
        });
        Resolution::Committed
    }

    /// Forget the fetch with sequence number `seq` if it is still the one in
    /// flight. Its future was dropped, so no response will ever arrive.
    fn abandon_fetch(&mut self, seq: u64) {
        if self.in_flight.as_ref().is_some_and(|t| t.seq == seq) {
            debug!(seq, "list fetch abandoned");
            self.in_flight = None;
        }
    }

    /// Release a favorite toggle whose request never completed.
    fn abandon_favorite(&mut self) {
        debug!("favorite toggle abandoned");
        self.pending_mutations = self.pending_mutations.saturating_sub(1);
    }

    /// Start a favorite toggle for the article with the given slug.
    ///
    /// # Errors
    ///
    /// Returns an error without touching any state if `slug` is empty.
    pub fn begin_favorite(
        &mut self,
        slug: &str,
        currently_favorited: bool,
    ) -> Result<FavoriteMutation, MutationError> {
        let direction = FavoriteDirection::toggle_from(currently_favorited);
        if slug.is_empty() {
            return Err(MutationError::new(slug, direction, ApiError::InvalidSlug));
        }
        self.pending_mutations += 1;
        Ok(FavoriteMutation {
            slug: slug.to_string(),
            direction,
        })
    }

    /// Finish a favorite toggle.
    ///
    /// Success invalidates every cached list so the next render re-fetches.
    /// Failure leaves the displayed articles untouched.
    ///
    /// # Errors
    ///
    /// Returns the API failure wrapped in a [`MutationError`].
    pub fn finish_favorite(
        &mut self,
        mutation: FavoriteMutation,
        result: ApiResult<Article>,
    ) -> Result<Article, MutationError> {
        self.pending_mutations = self.pending_mutations.saturating_sub(1);
        match result {
            Ok(article) => {
                self.cache.invalidate_all();
                Ok(article)
            }
            Err(err) => Err(MutationError::new(mutation.slug, mutation.direction, err)),
        }
    }

    /// The view for the current state.
    #[must_use]
    pub fn view(&self) -> FeedView {
        let loading = FeedView::Loading {
            placeholders: self.limit,
        };
        if self.is_loading() {
            return loading;
        }

        let Some(committed) = &self.committed else {
            return loading;
        };
        if self.current.as_ref() != Some(&committed.query) {
            return loading;
        }

        match &committed.outcome {
            Outcome::Failed(err) => FeedView::Error {
                message: err.to_string(),
            },
            Outcome::Loaded(list) if list.is_empty() => FeedView::Empty {
                message: EMPTY_FEED_MESSAGE,
            },
            Outcome::Loaded(list) => {
                let total = list.articles_count.max(list.articles.len() as u64);
                FeedView::Populated {
                    cards: list.articles.iter().map(ArticleCard::from).collect(),
                    pagination: Pagination {
                        count: page_count(total, self.limit),
                        page: committed.query.page,
                    },
                }
            }
        }
    }
}
