//! Text and JSON rendering of command results.

use std::iter;

use crate::error::Result;
use crate::feed::{ArticleCard, FeedView};

use super::OutputFormat;

/// Render a feed view in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_feed(view: &FeedView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(plain_feed(view)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
    }
}

fn plain_feed(view: &FeedView) -> String {
    match view {
        FeedView::Loading { placeholders } => format!("Loading {placeholders} articles..."),
        FeedView::Empty { message } => (*message).to_string(),
        FeedView::Error { message } => format!("Failed to load articles: {message}"),
        FeedView::Populated { cards, pagination } => cards
            .iter()
            .map(plain_card)
            .chain(iter::once(format!(
                "Page {} of {}",
                pagination.page, pagination.count
            )))
            .collect(),
    }
}

fn plain_card(card: &ArticleCard) -> String {
    let heart = if card.is_favorite { "♥" } else { "♡" };
    let mut lines = vec![
        format!("{}  [{}]", card.title, card.slug),
        format!(
            "  {} · {} · {heart} {}",
            card.author, card.date, card.favorites_count
        ),
    ];
    if !card.description.is_empty() {
        lines.push(format!("  {}", card.description));
    }
    if !card.tag_list.is_empty() {
        lines.push(format!("  #{}", card.tag_list.join(" #")));
    }
    lines.join("\n") + "\n\n"
}
