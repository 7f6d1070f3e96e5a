use crate::config::{AggregatorConfig, LocalityConfig};
use crate::dedup::Deduplicator;
use crate::output::{JsonWriter, NewsDocument};
use crate::ranking::rank_by_recency;
use crate::relevance::RelevanceClassifier;
use crate::sources::{NewsApiSource, RssFeedSource};
use crate::traits::{NewsSource, SourceKind};
use crate::types::{AggregatorError, Article, RawArticle, Result};
use crate::Fetcher;
use chrono::Local;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// What one source contributed to a run.
#[derive(Debug)]
pub enum SourceOutcome {
    Fetched(Vec<RawArticle>),
    Failed { reason: String },
}

/// Per-source line of a run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStatus {
    pub source_name: String,
    pub kind: SourceKind,
    pub records: usize,
    pub error: Option<String>,
}

impl SourceStatus {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct AggregationReport {
    pub collected: usize,
    pub relevant: usize,
    pub sources: Vec<SourceStatus>,
    pub articles: Vec<Article>,
}

impl AggregationReport {
    pub fn unique(&self) -> usize {
        self.articles.len()
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceStatus> {
        self.sources.iter().filter(|s| s.is_failure())
    }

    pub fn into_document(self, locality_name: &str) -> NewsDocument {
        NewsDocument::from_articles(locality_name, Local::now(), self.articles)
    }
}

/// Runs fetch → normalize → relevance → dedup → rank over a fixed set of
/// sources.
pub struct NewsAggregator {
    locality: LocalityConfig,
    classifier: RelevanceClassifier,
    sources: Vec<Box<dyn NewsSource>>,
    max_concurrent_fetches: usize,
    source_timeout: Duration,
}

impl NewsAggregator {
    pub fn new(locality: LocalityConfig) -> Self {
        let classifier = RelevanceClassifier::new(&locality);
        Self {
            locality,
            classifier,
            sources: Vec::new(),
            max_concurrent_fetches: 4,
            source_timeout: Duration::from_secs(60),
        }
    }

    /// Builds the aggregator with every configured RSS feed, in order,
    /// followed by the search source.
    pub fn from_config(config: &AggregatorConfig) -> Result<Self> {
        let fetcher = Arc::new(Fetcher::new(config.fetch.clone())?);

        let mut aggregator = Self::new(config.locality.clone())
            .with_max_concurrent_fetches(config.max_concurrent_fetches)
            .with_source_timeout(Duration::from_secs(config.source_timeout_seconds));

        for feed in &config.sources.feeds {
            aggregator.add_source(Box::new(RssFeedSource::new(
                feed.clone(),
                fetcher.clone(),
                config.sources.max_entries_per_feed,
            )));
        }

        let newsapi = NewsApiSource::new(config.sources.newsapi.clone(), &config.locality, fetcher);
        if !newsapi.is_enabled() {
            info!("NEWSAPI_KEY not set, search source will be skipped");
        }
        aggregator.add_source(Box::new(newsapi));

        Ok(aggregator)
    }

    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max.max(1);
        self
    }

    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    pub fn add_source(&mut self, source: Box<dyn NewsSource>) {
        info!("Adding {} source: {}", source.kind(), source.source_name());
        self.sources.push(source);
    }

    pub fn locality(&self) -> &LocalityConfig {
        &self.locality
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// One complete run. Source failures only shrink the result.
    pub async fn run(&self) -> AggregationReport {
        info!(
            "Starting {} news run with {} sources",
            self.locality.name,
            self.sources.len()
        );

        let outcomes = self.collect_sources().await;

        let mut statuses = Vec::with_capacity(outcomes.len());
        let mut collected = Vec::new();

        for (source, outcome) in self.sources.iter().zip(outcomes) {
            let source_name = source.source_name();
            let status = match outcome {
                SourceOutcome::Fetched(records) => {
                    let count = records.len();
                    collected.extend(
                        records
                            .into_iter()
                            .map(|raw| Article::from_raw(raw, &self.locality)),
                    );
                    SourceStatus {
                        source_name,
                        kind: source.kind(),
                        records: count,
                        error: None,
                    }
                }
                SourceOutcome::Failed { reason } => SourceStatus {
                    source_name,
                    kind: source.kind(),
                    records: 0,
                    error: Some(reason),
                },
            };
            statuses.push(status);
        }

        let total = collected.len();
        let relevant = self.classifier.filter(collected);
        let relevant_count = relevant.len();
        let unique = Deduplicator::new().dedupe(relevant);
        let articles = rank_by_recency(unique);

        info!("Total collected: {}", total);
        info!("Local relevance: {}", relevant_count);
        info!("Final unique: {}", articles.len());

        let failed = statuses.iter().filter(|s| s.is_failure()).count();
        if failed > 0 {
            warn!("{}/{} sources failed this run", failed, statuses.len());
        }

        AggregationReport {
            collected: total,
            relevant: relevant_count,
            sources: statuses,
            articles,
        }
    }

    /// Runs the pipeline and persists the resulting document.
    pub async fn run_to_writer(&self, writer: &JsonWriter) -> Result<NewsDocument> {
        let document = self.run().await.into_document(&self.locality.name);
        writer.write(&document)?;
        Ok(document)
    }

    /// Pulls every source with bounded concurrency; results come back in
    /// source order.
    async fn collect_sources(&self) -> Vec<SourceOutcome> {
        let pulls: Vec<_> = self
            .sources
            .iter()
            .map(|source| self.pull_source(source.as_ref()))
            .collect();

        stream::iter(pulls)
            .buffered(self.max_concurrent_fetches)
            .collect()
            .await
    }

    async fn pull_source(&self, source: &dyn NewsSource) -> SourceOutcome {
        let source_name = source.source_name();

        match tokio::time::timeout(self.source_timeout, source.pull()).await {
            Ok(Ok(records)) => SourceOutcome::Fetched(records),
            Ok(Err(e)) => {
                error!("{} {} error: {}", source_name, source.kind(), e);
                SourceOutcome::Failed {
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                let e = AggregatorError::Timeout {
                    source_name: source_name.clone(),
                    seconds: self.source_timeout.as_secs(),
                };
                error!("{}", e);
                SourceOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
