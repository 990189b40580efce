//! Async driver that runs the feed controller against an API.
//!
//! The controller marks itself loading before a request goes out. If the
//! caller drops a request future early (a timeout, `select!`, an aborted
//! task), [`Outstanding`] rolls that mark back so the feed cannot stay
//! loading for a request nobody will ever resolve.

use tracing::debug;

use super::{FeedController, FeedView, Resolution};
use crate::api::ArticleApi;
use crate::article::{Article, FavoriteDirection};
use crate::error::MutationError;
use crate::location::Location;
use crate::page::Page;
use crate::store::Store;

#[derive(Debug, Clone, Copy)]
enum Request {
    Fetch(u64),
    Favorite,
}

/// Undoes the loading bookkeeping of a request unless it is completed.
#[derive(Debug)]
struct Outstanding<'a> {
    controller: &'a mut FeedController,
    request: Request,
    armed: bool,
}

impl<'a> Outstanding<'a> {
    fn new(controller: &'a mut FeedController, request: Request) -> Self {
        Self {
            controller,
            request,
            armed: true,
        }
    }

    /// Hand the controller back for the normal completion path.
    fn complete(&mut self) -> &mut FeedController {
        self.armed = false;
        self.controller
    }
}

impl Drop for Outstanding<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match self.request {
            Request::Fetch(seq) => self.controller.abandon_fetch(seq),
            Request::Favorite => self.controller.abandon_favorite(),
        }
    }
}

/// A [`FeedController`] wired to an [`ArticleApi`].
#[derive(Debug)]
pub struct Feed<A> {
    api: A,
    controller: FeedController,
}

impl<A: ArticleApi> Feed<A> {
    /// Pair a controller with an API.
    #[must_use]
    pub fn new(api: A, controller: FeedController) -> Self {
        Self { api, controller }
    }

    /// The underlying controller.
    #[must_use]
    pub fn controller(&self) -> &FeedController {
        &self.controller
    }

    /// Mutable access to the underlying controller.
    #[must_use]
    pub fn controller_mut(&mut self) -> &mut FeedController {
        &mut self.controller
    }

    /// The API this feed talks to.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Render, waiting for any fetch the render pass issues.
    ///
    /// Dropping the returned future before it completes forgets the fetch,
    /// so the next render sends it again.
    pub async fn render(&mut self, store: &mut Store, location: &mut Location) -> FeedView {
        if let Some(ticket) = self.controller.on_render(store, location) {
            let mut outstanding =
                Outstanding::new(&mut self.controller, Request::Fetch(ticket.seq));
            let result = self.api.fetch_articles(ticket.query()).await;
            if outstanding.complete().resolve(ticket, result) == Resolution::Stale {
                debug!("render resolved a superseded request");
            }
        }
        self.controller.view()
    }

    /// Select `page` and render it.
    pub async fn paginate(
        &mut self,
        store: &mut Store,
        location: &mut Location,
        page: Page,
    ) -> FeedView {
        self.controller.on_paginate(store, location, page);
        self.render(store, location).await
    }

    /// Favorite or unfavorite an article.
    ///
    /// Dropping the returned future before it completes releases the
    /// loading state without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] if the slug is empty or the API call fails.
    /// The feed is left exactly as it was in that case.
    pub async fn toggle_favorite(
        &mut self,
        slug: &str,
        currently_favorited: bool,
    ) -> Result<Article, MutationError> {
        let mutation = self.controller.begin_favorite(slug, currently_favorited)?;
        let mut outstanding = Outstanding::new(&mut self.controller, Request::Favorite);
        let result = match mutation.direction() {
            FavoriteDirection::Add => self.api.add_favorite(mutation.slug()).await,
            FavoriteDirection::Remove => self.api.remove_favorite(mutation.slug()).await,
        };
        outstanding.complete().finish_favorite(mutation, result)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;
    use crate::api::mock::MockApi;
    use crate::api::ApiError;
    use crate::article::sample_article;
    use crate::config::ARTICLES_LIMIT_COUNT;
    use crate::feed::EMPTY_FEED_MESSAGE;
    use crate::location::NavigationState;
    use crate::logging::init_test_logging;
    use crate::route::Route;
    use crate::store::{sample_user, Action};

    fn articles(count: usize) -> Vec<Article> {
        (0..count)
            .map(|i| sample_article(&format!("article-{i}")))
            .collect()
    }

    fn feed(api: MockApi) -> Feed<MockApi> {
        Feed::new(
            api,
            FeedController::new(ARTICLES_LIMIT_COUNT, Duration::from_secs(60)),
        )
    }

    #[tokio::test]
    async fn test_render_empty_feed() {
        let mut feed = feed(MockApi::default());
        let mut store = Store::new();
        let mut location = Location::new(Route::Home);

        let view = feed.render(&mut store, &mut location).await;
        assert_eq!(
            view,
            FeedView::Empty {
                message: EMPTY_FEED_MESSAGE
            }
        );
        assert!(view.pagination().is_none());
    }

    #[tokio::test]
    async fn test_render_25_articles_has_two_pages() {
        let mut feed = feed(MockApi::with_articles(articles(25)));
        let mut store = Store::new();
        let mut location = Location::new(Route::Home);

        let view = feed.render(&mut store, &mut location).await;
        assert_eq!(view.cards().len(), 20);
        assert_eq!(view.pagination().unwrap().count, 2);

        let view = feed
            .paginate(&mut store, &mut location, Page::new(2).unwrap())
            .await;
        assert_eq!(view.cards().len(), 5);
        assert_eq!(view.pagination().unwrap().page, Page::new(2).unwrap());
        assert_eq!(location.href(), "/?page=2");
    }

    #[tokio::test]
    async fn test_rerender_uses_cache() {
        let mut feed = feed(MockApi::with_articles(articles(3)));
        let mut store = Store::new();
        let mut location = Location::new(Route::Home);

        feed.render(&mut store, &mut location).await;
        feed.render(&mut store, &mut location).await;
        assert_eq!(feed.api().fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_login_transition_refetches() {
        let mut feed = feed(MockApi::with_articles(articles(3)));
        let mut store = Store::new();
        let mut location = Location::new(Route::Home);
        feed.render(&mut store, &mut location).await;

        store.dispatch(Action::SignIn(sample_user("alice")));
        location.state = NavigationState::from_route(Route::Login);
        feed.render(&mut store, &mut location).await;
        feed.render(&mut store, &mut location).await;

        assert_eq!(feed.api().fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_favorite_updates_after_refetch() {
        let mut feed = feed(MockApi::with_articles(articles(2)));
        let mut store = Store::new();
        let mut location = Location::new(Route::Home);
        feed.render(&mut store, &mut location).await;

        let article = feed.toggle_favorite("article-1", false).await.unwrap();
        assert!(article.favorited);
        assert_eq!(article.favorites_count, 1);

        let view = feed.render(&mut store, &mut location).await;
        assert_eq!(feed.api().fetch_calls(), 2);
        let card = view.cards().iter().find(|c| c.slug == "article-1").unwrap();
        assert!(card.is_favorite);
    }

    #[tokio::test]
    async fn test_unfavorite_empties_favorites_filter() {
        let mut favorited = sample_article("only");
        favorited.favorited = true;
        favorited.favorites_count = 1;
        let mut feed = feed(MockApi::with_articles(vec![favorited]));
        let mut store = Store::new();
        store.dispatch(Action::SignIn(sample_user("alice")));
        let mut location = Location::parse("/user/articles/favorite").unwrap();

        let view = feed.render(&mut store, &mut location).await;
        assert_eq!(view.cards().len(), 1);

        feed.toggle_favorite("only", true).await.unwrap();
        let view = feed.render(&mut store, &mut location).await;
        assert_eq!(
            view,
            FeedView::Empty {
                message: EMPTY_FEED_MESSAGE
            }
        );
    }

    #[tokio::test]
    async fn test_rejected_favorite_leaves_feed_unchanged() {
        init_test_logging();
        let api = MockApi::with_articles(articles(2));
        api.fail_mutations_with(Some(ApiError::Unauthorized));
        let mut feed = feed(api);
        let mut store = Store::new();
        let mut location = Location::new(Route::Home);
        let before = feed.render(&mut store, &mut location).await;

        let result = feed.toggle_favorite("article-0", false).await;
        assert!(result.is_err());
        assert!(!feed.controller().is_loading());

        let after = feed.render(&mut store, &mut location).await;
        assert_eq!(before, after);
        let stored = feed.api().article("article-0").unwrap();
        assert!(!stored.favorited);
        assert_eq!(stored.favorites_count, 0);
        assert_eq!(feed.api().fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_slug_never_reaches_api() {
        let mut feed = feed(MockApi::default());
        assert!(feed.toggle_favorite("", false).await.is_err());
        assert_eq!(feed.api().mutation_calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_renders_error() {
        let api = MockApi::default();
        api.fail_fetches_with(Some(ApiError::Network("connection refused".to_string())));
        let mut feed = feed(api);
        let mut store = Store::new();
        let mut location = Location::new(Route::Home);

        let view = feed.render(&mut store, &mut location).await;
        match view {
            FeedView::Error { message } => assert!(message.contains("connection refused")),
            other => panic!("unexpected view: {other:?}"),
        }

        feed.api().fail_fetches_with(None);
        feed.controller_mut().refetch();
        let view = feed.render(&mut store, &mut location).await;
        assert!(matches!(view, FeedView::Empty { .. }));
    }

    #[tokio::test]
    async fn test_cancelled_render_fetches_again() {
        let api = MockApi::with_articles(articles(3));
        api.stall_fetches(true);
        let mut feed = feed(api);
        let mut store = Store::new();
        let mut location = Location::new(Route::Home);

        let cancelled = timeout(
            Duration::from_millis(20),
            feed.render(&mut store, &mut location),
        )
        .await;
        assert!(cancelled.is_err());
        assert!(!feed.controller().is_loading());

        feed.api().stall_fetches(false);
        let view = feed.render(&mut store, &mut location).await;
        assert_eq!(view.cards().len(), 3);
        assert_eq!(feed.api().fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_toggle_releases_loading() {
        let mut feed = feed(MockApi::with_articles(articles(2)));
        let mut store = Store::new();
        let mut location = Location::new(Route::Home);
        let before = feed.render(&mut store, &mut location).await;

        feed.api().stall_mutations(true);
        let cancelled = timeout(
            Duration::from_millis(20),
            feed.toggle_favorite("article-0", false),
        )
        .await;
        assert!(cancelled.is_err());
        assert!(!feed.controller().is_loading());

        let after = feed.render(&mut store, &mut location).await;
        assert_eq!(before, after);
        assert_eq!(feed.api().fetch_calls(), 1);
    }
}
