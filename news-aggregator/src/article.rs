use crate::config::LocalityConfig;
use crate::types::{Article, RawArticle};
use scraper::Html;

/// Maximum length, in characters, of the plain-text description and content.
pub const MAX_TEXT_CHARS: usize = 500;

const ID_HEX_LEN: usize = 12;

impl Article {
    /// Normalizes a raw adapter record into a canonical article.
    ///
    /// Never fails: absent fields become empty strings, the author falls back
    /// to the source name and the region is inferred when not supplied.
    /// Records with an empty title are still built; the deduplicator drops them.
    pub fn from_raw(raw: RawArticle, locality: &LocalityConfig) -> Self {
        let title = trimmed(raw.title);
        let source = trimmed(raw.source);
        let description = html_to_text(raw.description.as_deref().unwrap_or(""));
        let content = html_to_text(raw.content.as_deref().unwrap_or(""));

        let author = match trimmed(raw.author) {
            author if author.is_empty() => source.clone(),
            author => author,
        };

        let region = match trimmed(raw.region) {
            region if region.is_empty() => detect_region(&title, &description, locality),
            region => region,
        };

        Self {
            id: article_id(&title, &source),
            url: trimmed(raw.url),
            image_url: trimmed(raw.image_url),
            published_at: trimmed(raw.published_at),
            title,
            description,
            source,
            author,
            content,
            region,
            is_admin_alert: false,
        }
    }

    /// Lower-cased `title + description`, the text relevance and region
    /// detection look at.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Stable identifier: first 12 hex chars of MD5 over the lower-cased
/// concatenation of title and source.
pub fn article_id(title: &str, source: &str) -> String {
    let raw = format!("{}{}", title, source).to_lowercase();
    let digest = format!("{:x}", md5::compute(raw.as_bytes()));
    digest[..ID_HEX_LEN].to_string()
}

/// Strips markup from an HTML fragment and returns collapsed plain text,
/// truncated to [`MAX_TEXT_CHARS`] characters.
pub fn html_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<String>();

    text.replace("&nbsp;", " ")
        .replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_TEXT_CHARS)
        .collect()
}

/// Returns the label of the first region keyword, in table order, found in
/// the title or description; the locality name otherwise.
pub fn detect_region(title: &str, description: &str, locality: &LocalityConfig) -> String {
    let text = format!("{} {}", title, description).to_lowercase();

    locality
        .region_table
        .iter()
        .find(|(keyword, _)| text.contains(keyword.as_str()))
        .map(|(_, label)| label.clone())
        .unwrap_or_else(|| locality.name.clone())
}
