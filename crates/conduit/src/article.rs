//! Article data model.
//!
//! These types mirror the RealWorld API payloads. The feed only ever holds
//! them as a read-only snapshot of the latest committed query result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public profile of an article author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique username.
    pub username: String,
    /// Short biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Whether the viewer follows this author.
    #[serde(default)]
    pub following: bool,
}

/// A published article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Unique, immutable identity.
    pub slug: String,
    /// Article title.
    pub title: String,
    /// Short description shown on cards.
    pub description: String,
    /// Full body, absent from some list endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Ordered tags.
    #[serde(default)]
    pub tag_list: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether the viewer has favorited this article.
    #[serde(default)]
    pub favorited: bool,
    /// Number of users who favorited this article.
    #[serde(default)]
    pub favorites_count: u32,
    /// The author.
    pub author: Profile,
}

impl Article {
    /// Creation date as shown on article cards, e.g. `March 5, 2024`.
    #[must_use]
    pub fn formatted_date(&self) -> String {
        self.created_at.format("%B %-d, %Y").to_string()
    }
}

/// One page of articles together with the total across all pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleList {
    /// Articles on this page.
    pub articles: Vec<Article>,
    /// Total number of articles matching the query.
    pub articles_count: u64,
}

impl ArticleList {
    /// Check if the page carries no articles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Whether a favorite is being added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteDirection {
    /// Mark the article as favorited.
    Add,
    /// Remove the favorite.
    Remove,
}

impl FavoriteDirection {
    /// The direction that flips the given favorited state.
    #[must_use]
    pub fn toggle_from(currently_favorited: bool) -> Self {
        if currently_favorited {
            Self::Remove
        } else {
            Self::Add
        }
    }
}

impl std::fmt::Display for FavoriteDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_article(slug: &str) -> Article {
    Article {
        slug: slug.to_string(),
        title: format!("Title of {slug}"),
        description: "description".to_string(),
        body: None,
        tag_list: vec!["rust".to_string()],
        created_at: DateTime::parse_from_rfc3339("2024-03-05T10:00:00Z")
            .map(|d| d.with_timezone(&Utc))
            .unwrap(),
        updated_at: None,
        favorited: false,
        favorites_count: 0,
        author: Profile {
            username: "alice".to_string(),
            bio: None,
            image: None,
            following: false,
        },
    }
}
