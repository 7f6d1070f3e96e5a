use crate::config::FeedSpec;
use crate::traits::{NewsSource, SourceKind};
use crate::types::{AggregatorError, RawArticle, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One named RSS/Atom feed.
pub struct RssFeedSource {
    pub spec: FeedSpec,
    fetcher: Arc<Fetcher>,
    parser: FeedParser,
}

impl RssFeedSource {
    pub fn new(spec: FeedSpec, fetcher: Arc<Fetcher>, max_entries: usize) -> Self {
        let parser = FeedParser::new(spec.name.clone(), max_entries);
        Self {
            spec,
            fetcher,
            parser,
        }
    }
}

#[async_trait]
impl NewsSource for RssFeedSource {
    fn source_name(&self) -> String {
        self.spec.name.clone()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Rss
    }

    async fn pull(&self) -> Result<Vec<RawArticle>> {
        info!("Fetching {} RSS: {}", self.spec.name, self.spec.url);

        let fetch_result = self.fetcher.fetch_feed(&self.spec.url).await?;

        if !fetch_result.success {
            let error_msg = fetch_result
                .error
                .unwrap_or_else(|| "Fetch failed".to_string());
            return Err(AggregatorError::General(format!(
                "{} (status {:?}): {}",
                fetch_result.url, fetch_result.http_status, error_msg
            )));
        }

        let content = match fetch_result.content {
            Some(content) => content,
            None => {
                warn!("No content returned for RSS feed {}", self.spec.url);
                return Ok(Vec::new());
            }
        };

        let parsed_feed = self.parser.parse_feed(&content, fetch_result.fetch_time)?;

        info!(
            "Pulled {} entries from {} ({}) in {}ms, HTTP {:?}",
            parsed_feed.entries.len(),
            self.spec.name,
            parsed_feed.title.as_deref().unwrap_or("untitled feed"),
            fetch_result.response_time_ms,
            fetch_result.http_status
        );
        if let Some(description) = parsed_feed.description.as_deref() {
            debug!("{} describes itself as: {}", self.spec.name, description);
        }
        Ok(parsed_feed.entries)
    }
}
