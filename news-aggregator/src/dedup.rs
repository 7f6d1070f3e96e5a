use crate::types::Article;
use std::collections::HashSet;
use tracing::{debug, info};

/// Tombstone title NewsAPI returns for withdrawn articles.
pub const REMOVED_MARKER: &str = "[Removed]";

/// Number of characters of the normalized title used as the near-duplicate key.
pub const TITLE_PREFIX_CHARS: usize = 50;

/// Collapses duplicates across sources, keeping the first article seen.
///
/// An article is a duplicate when either its id or its normalized title
/// prefix was seen before. The title key catches the same story republished
/// under another source label, at the cost of also merging distinct stories
/// that share a headline.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen_ids: HashSet<String>,
    seen_titles: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dedupe(&mut self, articles: Vec<Article>) -> Vec<Article> {
        let total = articles.len();
        let mut unique = Vec::with_capacity(total);

        for article in articles {
            if !is_valid_title(&article.title) {
                debug!("Dropping article without usable title from {}", article.source);
                continue;
            }

            let prefix = title_prefix(&article.title);
            if self.seen_ids.contains(&article.id) || self.seen_titles.contains(&prefix) {
                debug!("Removing duplicate article: {} ({})", article.title, article.source);
                continue;
            }

            self.seen_ids.insert(article.id.clone());
            self.seen_titles.insert(prefix);
            unique.push(article);
        }

        let removed = total - unique.len();
        if removed > 0 {
            info!("Removed {} duplicate or invalid articles", removed);
        }

        unique
    }
}

fn is_valid_title(title: &str) -> bool {
    !title.trim().is_empty() && !title.contains(REMOVED_MARKER)
}

/// Lower-cased, trimmed, first 50 characters of the title.
pub fn title_prefix(title: &str) -> String {
    title
        .to_lowercase()
        .trim()
        .chars()
        .take(TITLE_PREFIX_CHARS)
        .collect()
}
