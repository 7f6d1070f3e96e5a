#![allow(dead_code)]

use async_trait::async_trait;
use news_aggregator::{
    AggregatorError, Article, FetchConfig, LocalityConfig, NewsSource, RawArticle, Result,
    SourceKind,
};
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

/// Fetch settings for local mock servers: no retries, no host spacing.
pub fn test_fetch_config() -> FetchConfig {
    FetchConfig {
        user_agent: "news-aggregator-test/1.0".to_string(),
        timeout_seconds: 5,
        max_retries: 0,
        retry_delay_seconds: 0,
        max_feed_size_mb: 10,
        max_redirects: 5,
        min_host_interval_ms: 0,
    }
}

pub fn raw(title: &str, source: &str, description: &str, published_at: &str) -> RawArticle {
    RawArticle {
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        url: Some(format!("https://example.com/{}", title.to_lowercase().replace(' ', "-"))),
        published_at: Some(published_at.to_string()),
        source: Some(source.to_string()),
        ..Default::default()
    }
}

pub fn article(title: &str, source: &str, description: &str, published_at: &str) -> Article {
    Article::from_raw(raw(title, source, description, published_at), &LocalityConfig::butuan())
}

/// Source that always returns the same records.
pub struct StaticSource {
    pub name: String,
    pub records: Vec<RawArticle>,
}

impl StaticSource {
    pub fn new(name: &str, records: Vec<RawArticle>) -> Self {
        Self {
            name: name.to_string(),
            records,
        }
    }
}

#[async_trait]
impl NewsSource for StaticSource {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Rss
    }

    async fn pull(&self) -> Result<Vec<RawArticle>> {
        Ok(self.records.clone())
    }
}

/// Source whose upstream is always broken.
pub struct FailingSource {
    pub name: String,
}

#[async_trait]
impl NewsSource for FailingSource {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Rss
    }

    async fn pull(&self) -> Result<Vec<RawArticle>> {
        Err(AggregatorError::General("connection reset by peer".to_string()))
    }
}

/// Source that never answers within any reasonable timeout.
pub struct HangingSource {
    pub name: String,
}

#[async_trait]
impl NewsSource for HangingSource {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Search
    }

    async fn pull(&self) -> Result<Vec<RawArticle>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}
