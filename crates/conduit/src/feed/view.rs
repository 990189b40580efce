//! What the feed shows for a given controller state.

use serde::Serialize;

use crate::article::Article;
use crate::page::Page;

/// Message shown when a query resolves with no articles.
pub const EMPTY_FEED_MESSAGE: &str = "No articles :C";

/// Summary of one article as displayed in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleCard {
    /// Article identity, used for favorite toggles.
    pub slug: String,
    /// Title.
    pub title: String,
    /// Short description.
    pub description: String,
    /// Number of favorites.
    pub favorites_count: u32,
    /// Whether the viewer favorited the article.
    pub is_favorite: bool,
    /// Author username.
    pub author: String,
    /// Author avatar.
    pub author_image: Option<String>,
    /// Tags in server order.
    pub tag_list: Vec<String>,
    /// Formatted creation date.
    pub date: String,
}

impl From<&Article> for ArticleCard {
    fn from(article: &Article) -> Self {
        Self {
            slug: article.slug.clone(),
            title: article.title.clone(),
            description: article.description.clone(),
            favorites_count: article.favorites_count,
            is_favorite: article.favorited,
            author: article.author.username.clone(),
            author_image: article.author.image.clone(),
            tag_list: article.tag_list.clone(),
            date: article.formatted_date(),
        }
    }
}

/// Pagination control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Total number of pages.
    pub count: u64,
    /// Page shown as current.
    pub page: Page,
}

/// The mutually exclusive states the feed renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedView {
    /// A fetch or favorite mutation is outstanding, or nothing has loaded yet.
    Loading {
        /// Number of placeholder cards to show.
        placeholders: u32,
    },
    /// The query resolved with zero articles.
    Empty {
        /// Fixed empty-state message.
        message: &'static str,
    },
    /// The query failed.
    Error {
        /// What went wrong.
        message: String,
    },
    /// The query resolved with articles.
    Populated {
        /// One card per article.
        cards: Vec<ArticleCard>,
        /// Pagination control.
        pagination: Pagination,
    },
}

impl FeedView {
    /// Check if the feed is in the loading state.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Pagination control, present only when populated.
    #[must_use]
    pub fn pagination(&self) -> Option<Pagination> {
        match self {
            Self::Populated { pagination, .. } => Some(*pagination),
            _ => None,
        }
    }

    /// Cards on screen; empty for every state but populated.
    #[must_use]
    pub fn cards(&self) -> &[ArticleCard] {
        match self {
            Self::Populated { cards, .. } => cards,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::sample_article;

    #[test]
    fn test_card_from_article() {
        let mut article = sample_article("x");
        article.favorited = true;
        article.favorites_count = 7;

        let card = ArticleCard::from(&article);
        assert_eq!(card.slug, "x");
        assert!(card.is_favorite);
        assert_eq!(card.favorites_count, 7);
        assert_eq!(card.author, "alice");
        assert_eq!(card.date, "March 5, 2024");
    }

    #[test]
    fn test_view_accessors() {
        let loading = FeedView::Loading { placeholders: 20 };
        assert!(loading.is_loading());
        assert!(loading.pagination().is_none());
        assert!(loading.cards().is_empty());

        let populated = FeedView::Populated {
            cards: vec![ArticleCard::from(&sample_article("a"))],
            pagination: Pagination {
                count: 1,
                page: Page::FIRST,
            },
        };
        assert!(!populated.is_loading());
        assert_eq!(populated.cards().len(), 1);
        assert_eq!(populated.pagination().unwrap().count, 1);
    }

    #[test]
    fn test_view_serialization_tag() {
        let json = serde_json::to_string(&FeedView::Empty {
            message: EMPTY_FEED_MESSAGE,
        })
        .unwrap();
        assert_eq!(json, r#"{"state":"empty","message":"No articles :C"}"#);
    }
}
