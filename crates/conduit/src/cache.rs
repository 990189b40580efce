//! Keyed cache of article list results.
//!
//! Results are keyed by the full [`ArticleQuery`], so a change of page or
//! filter never serves another key's data. Entries go stale after the TTL
//! or when a mutation invalidates the cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::api::ArticleQuery;
use crate::article::ArticleList;

#[derive(Debug, Clone)]
struct CacheEntry {
    list: ArticleList,
    fetched_at: Instant,
}

/// Cache of list results with freshness tracking.
#[derive(Debug, Clone)]
pub struct QueryCache {
    ttl: Duration,
    generation: u64,
    entries: HashMap<ArticleQuery, CacheEntry>,
}

impl QueryCache {
    /// Create an empty cache. A zero TTL disables reuse entirely.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            generation: 0,
            entries: HashMap::new(),
        }
    }

    /// Invalidation counter; requests record it when issued.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A result for `query` that is still fresh.
    #[must_use]
    pub fn get_fresh(&self, query: &ArticleQuery) -> Option<&ArticleList> {
        self.entries
            .get(query)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| &entry.list)
    }

    /// Store a result fetched by a request issued at `generation`.
    ///
    /// Expired entries are dropped first. Returns `false` without storing if
    /// the cache was invalidated after the request went out, since the result
    /// may predate the mutation.
    pub fn insert(&mut self, query: ArticleQuery, list: ArticleList, generation: u64) -> bool {
        self.prune_expired();
        if generation != self.generation {
            debug!(?query, "not caching result requested before invalidation");
            return false;
        }
        self.entries.insert(
            query,
            CacheEntry {
                list,
                fetched_at: Instant::now(),
            },
        );
        true
    }

    /// Drop every cached list.
    pub fn invalidate_all(&mut self) {
        self.generation += 1;
        self.entries.clear();
        debug!(generation = self.generation, "list cache invalidated");
    }

    fn prune_expired(&mut self) {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
        let pruned = before - self.entries.len();
        if pruned > 0 {
            debug!(pruned, "expired list results dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::sample_article;
    use crate::filter::Filter;
    use crate::page::Page;

    fn list(slugs: &[&str]) -> ArticleList {
        ArticleList {
            articles: slugs.iter().map(|s| sample_article(s)).collect(),
            articles_count: slugs.len() as u64,
        }
    }

    fn key(page: u32) -> ArticleQuery {
        ArticleQuery::new(Page::new(page).unwrap(), Filter::None)
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = QueryCache::new(Duration::from_secs(60));
        assert!(cache.insert(key(1), list(&["a"]), cache.generation()));

        assert_eq!(cache.get_fresh(&key(1)), Some(&list(&["a"])));
        assert!(cache.get_fresh(&key(2)).is_none());
        assert_eq!(cache.entries.len(), 1);
    }

    #[test]
    fn test_keys_include_filter() {
        let mut cache = QueryCache::new(Duration::from_secs(60));
        let author = ArticleQuery::new(Page::FIRST, Filter::Author("a".to_string()));
        cache.insert(author.clone(), list(&["x"]), 0);

        let favorited = ArticleQuery::new(Page::FIRST, Filter::Favorited("a".to_string()));
        assert!(cache.get_fresh(&favorited).is_none());
        assert!(cache.get_fresh(&author).is_some());
    }

    #[test]
    fn test_zero_ttl_is_never_fresh() {
        let mut cache = QueryCache::new(Duration::ZERO);
        cache.insert(key(1), list(&["a"]), 0);
        assert!(cache.get_fresh(&key(1)).is_none());
    }

    #[test]
    fn test_insert_prunes_expired_entries() {
        let mut cache = QueryCache::new(Duration::ZERO);
        for page in 1..=10 {
            cache.insert(key(page), list(&["a"]), 0);
        }
        assert_eq!(cache.entries.len(), 1);
        assert!(cache.entries.contains_key(&key(10)));
    }

    #[test]
    fn test_insert_keeps_fresh_entries() {
        let mut cache = QueryCache::new(Duration::from_secs(60));
        cache.insert(key(1), list(&["a"]), 0);
        cache.insert(key(2), list(&["b"]), 0);

        assert_eq!(cache.entries.len(), 2);
        assert!(cache.get_fresh(&key(1)).is_some());
    }

    #[test]
    fn test_invalidate_all() {
        let mut cache = QueryCache::new(Duration::from_secs(60));
        cache.insert(key(1), list(&["a"]), 0);
        cache.invalidate_all();

        assert!(cache.entries.is_empty());
        assert_eq!(cache.generation(), 1);
    }

    #[test]
    fn test_insert_rejects_result_from_before_invalidation() {
        let mut cache = QueryCache::new(Duration::from_secs(60));
        let issued_at = cache.generation();
        cache.invalidate_all();

        assert!(!cache.insert(key(1), list(&["a"]), issued_at));
        assert!(cache.get_fresh(&key(1)).is_none());
    }
}
