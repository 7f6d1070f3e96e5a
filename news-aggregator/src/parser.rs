use crate::ranking::parse_published_at;
use crate::types::{AggregatorError, ParsedFeed, RawArticle, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use feed_rs::model::Entry;
use feed_rs::parser;
use scraper::{Html, Selector};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Turns RSS/Atom bytes into raw article records for one named feed.
pub struct FeedParser {
    feed_name: String,
    max_entries: usize,
}

impl FeedParser {
    pub fn new(feed_name: impl Into<String>, max_entries: usize) -> Self {
        Self {
            feed_name: feed_name.into(),
            max_entries,
        }
    }

    /// Parses the feed and maps at most `max_entries` entries.
    ///
    /// `fetch_time` stands in for entries that carry no date at all. A date
    /// that is present but unreadable is kept as its raw text.
    pub fn parse_feed(&self, content: &str, fetch_time: DateTime<Utc>) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes) for {}", content.len(), self.feed_name);

        let unreadable = UnreadableDates::default();
        let recorder = unreadable.clone();
        let feed = parser::Builder::new()
            .timestamp_parser(move |text| {
                read_feed_timestamp(text).or_else(|| Some(recorder.placeholder(text)))
            })
            .build()
            .parse(content.as_bytes())
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let description = feed.description.map(|d| d.content);

        let entries: Vec<RawArticle> = feed
            .entries
            .into_iter()
            .take(self.max_entries)
            .map(|entry| self.parse_entry(entry, fetch_time, &unreadable))
            .collect();

        debug!("Parsed {} entries from {}", entries.len(), self.feed_name);

        Ok(ParsedFeed {
            title,
            description,
            entries,
        })
    }

    fn parse_entry(
        &self,
        entry: Entry,
        fetch_time: DateTime<Utc>,
        unreadable: &UnreadableDates,
    ) -> RawArticle {
        let image_url = extract_image(&entry);

        let body = entry.content.as_ref().and_then(|c| c.body.clone());
        let summary = entry.summary.map(|s| s.content);
        let description = summary.or_else(|| body.clone());

        let published = match entry.published.or(entry.updated) {
            Some(date) => unreadable
                .raw_text(date)
                .unwrap_or_else(|| date.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => fetch_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        };

        let author = entry
            .authors
            .first()
            .map(|a| a.name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.feed_name.clone());

        RawArticle {
            title: entry.title.map(|t| t.content),
            description,
            url: entry.links.first().map(|l| l.href.clone()),
            image_url,
            published_at: Some(published),
            source: Some(self.feed_name.clone()),
            author: Some(author),
            content: body,
            region: None,
        }
    }
}

/// RFC 2822 (the RSS format) first, then the ISO-8601 shapes the ranker reads.
fn read_feed_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    DateTime::parse_from_rfc2822(text)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| parse_published_at(text))
}

/// Raw text of dates that could not be read during one parse.
///
/// feed-rs only keeps timestamps, so each unreadable date is handed back as a
/// placeholder just above `MIN_UTC`, offset by its index here.
#[derive(Clone, Default)]
struct UnreadableDates(Rc<RefCell<Vec<String>>>);

impl UnreadableDates {
    fn placeholder(&self, text: &str) -> DateTime<Utc> {
        let mut seen = self.0.borrow_mut();
        let index = seen.len() as i64;
        seen.push(text.trim().to_string());
        DateTime::<Utc>::MIN_UTC + Duration::seconds(index)
    }

    fn raw_text(&self, date: DateTime<Utc>) -> Option<String> {
        let index = (date - DateTime::<Utc>::MIN_UTC).num_seconds();
        let index = usize::try_from(index).ok()?;
        self.0.borrow().get(index).cloned()
    }
}

/// Image lookup, in order: media attachment, first inline `<img>` in the
/// entry HTML, first image-typed enclosure link.
pub fn extract_image(entry: &Entry) -> Option<String> {
    media_image(entry)
        .or_else(|| inline_image(entry))
        .or_else(|| enclosure_image(entry))
}

fn media_image(entry: &Entry) -> Option<String> {
    for media in &entry.media {
        for content in &media.content {
            let Some(url) = content.url.as_ref().map(|u| u.as_str().trim()) else {
                continue;
            };
            if url.is_empty() {
                continue;
            }
            let is_image = content
                .content_type
                .as_ref()
                .map(|m| m.to_string().starts_with("image/"))
                .unwrap_or(true);
            if is_image {
                return Some(url.to_string());
            }
        }

        if let Some(thumbnail) = media.thumbnails.first() {
            let uri = thumbnail.image.uri.trim();
            if !uri.is_empty() {
                return Some(uri.to_string());
            }
        }
    }
    None
}

fn inline_image(entry: &Entry) -> Option<String> {
    let html = entry
        .content
        .as_ref()
        .and_then(|c| c.body.as_deref())
        .or_else(|| entry.summary.as_ref().map(|s| s.content.as_str()))?;

    first_img_src(html)
}

/// `src` of the first `<img>` tag in an HTML fragment.
pub fn first_img_src(html: &str) -> Option<String> {
    let selector = Selector::parse("img[src]").ok()?;
    let fragment = Html::parse_fragment(html);

    fragment
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .find(|src| !src.is_empty())
        .map(str::to_string)
}

fn enclosure_image(entry: &Entry) -> Option<String> {
    entry
        .links
        .iter()
        .filter(|link| {
            link.media_type
                .as_deref()
                .map(|t| t.starts_with("image/"))
                .unwrap_or(false)
        })
        .map(|link| link.href.trim())
        .find(|href| !href.is_empty())
        .map(str::to_string)
}
