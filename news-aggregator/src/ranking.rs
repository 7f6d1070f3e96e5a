use crate::types::Article;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cmp::Reverse;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO-8601-like `publishedAt` value.
///
/// A trailing `Z` is treated as `+00:00`; naive timestamps and bare dates are
/// read as UTC. Returns `None` when nothing matches.
pub fn parse_published_at(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let normalized = match value.strip_suffix('Z') {
        Some(stripped) => format!("{}+00:00", stripped),
        None => value.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Sort key for an article; malformed dates map to the minimum timestamp.
pub fn sort_key(article: &Article) -> DateTime<Utc> {
    parse_published_at(&article.published_at).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Newest first. The sort is stable, so ties keep their incoming order and
/// unparseable dates sink to the end.
pub fn rank_by_recency(mut articles: Vec<Article>) -> Vec<Article> {
    articles.sort_by_cached_key(|article| Reverse(sort_key(article)));
    articles
}
