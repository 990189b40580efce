//! In-memory [`ArticleApi`] for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ApiError, ApiResult, ArticleApi, ArticleQuery};
use crate::article::{Article, ArticleList};
use crate::config::ARTICLES_LIMIT_COUNT;
use crate::filter::Filter;

/// Server stand-in holding a list of articles. Favorites belong to one viewer.
#[derive(Debug, Default)]
pub(crate) struct MockApi {
    articles: Mutex<Vec<Article>>,
    fetch_error: Mutex<Option<ApiError>>,
    mutation_error: Mutex<Option<ApiError>>,
    fetch_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
    stall_fetches: AtomicBool,
    stall_mutations: AtomicBool,
}

impl MockApi {
    pub(crate) fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles: Mutex::new(articles),
            ..Self::default()
        }
    }

    pub(crate) fn fail_fetches_with(&self, error: Option<ApiError>) {
        *self.fetch_error.lock().unwrap() = error;
    }

    pub(crate) fn fail_mutations_with(&self, error: Option<ApiError>) {
        *self.mutation_error.lock().unwrap() = error;
    }

    /// While set, list fetches never complete.
    pub(crate) fn stall_fetches(&self, stall: bool) {
        self.stall_fetches.store(stall, Ordering::SeqCst);
    }

    /// While set, favorite requests never complete.
    pub(crate) fn stall_mutations(&self, stall: bool) {
        self.stall_mutations.store(stall, Ordering::SeqCst);
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn article(&self, slug: &str) -> Option<Article> {
        self.articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.slug == slug)
            .cloned()
    }

    fn set_favorite(&self, slug: &str, favorited: bool) -> ApiResult<Article> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.mutation_error.lock().unwrap().clone() {
            return Err(err);
        }

        let mut articles = self.articles.lock().unwrap();
        let article = articles
            .iter_mut()
            .find(|a| a.slug == slug)
            .ok_or(ApiError::NotFound)?;
        if article.favorited != favorited {
            article.favorited = favorited;
            if favorited {
                article.favorites_count += 1;
            } else {
                article.favorites_count = article.favorites_count.saturating_sub(1);
            }
        }
        Ok(article.clone())
    }
}

#[async_trait::async_trait]
impl ArticleApi for MockApi {
    async fn fetch_articles(&self, query: &ArticleQuery) -> ApiResult<ArticleList> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        wait_unless_stalled(&self.stall_fetches).await;
        if let Some(err) = self.fetch_error.lock().unwrap().clone() {
            return Err(err);
        }

        let articles = self.articles.lock().unwrap();
        let matching: Vec<&Article> = articles
            .iter()
            .filter(|a| match &query.filter {
                Filter::None => true,
                Filter::Author(name) => &a.author.username == name,
                Filter::Favorited(_) => a.favorited,
            })
            .collect();

        let offset = usize::try_from(query.page.offset(ARTICLES_LIMIT_COUNT)).unwrap();
        let page = matching
            .iter()
            .skip(offset)
            .take(ARTICLES_LIMIT_COUNT as usize)
            .map(|a| (*a).clone())
            .collect();

        Ok(ArticleList {
            articles: page,
            articles_count: matching.len() as u64,
        })
    }

    async fn add_favorite(&self, slug: &str) -> ApiResult<Article> {
        wait_unless_stalled(&self.stall_mutations).await;
        self.set_favorite(slug, true)
    }

    async fn remove_favorite(&self, slug: &str) -> ApiResult<Article> {
        wait_unless_stalled(&self.stall_mutations).await;
        self.set_favorite(slug, false)
    }
}

async fn wait_unless_stalled(stall: &AtomicBool) {
    if stall.load(Ordering::SeqCst) {
        std::future::pending::<()>().await;
    }
}
