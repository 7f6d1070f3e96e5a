pub mod types;
pub mod config;
pub mod article;
pub mod fetcher;
pub mod parser;
pub mod traits;
pub mod sources;
pub mod relevance;
pub mod dedup;
pub mod ranking;
pub mod aggregator;
pub mod output;
pub mod scheduler;

pub use types::*;
pub use config::{AggregatorConfig, FeedSpec, LocalityConfig, NewsApiConfig, SourcesConfig};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use traits::{NewsSource, SourceKind};
pub use sources::{NewsApiSource, RssFeedSource};
pub use relevance::RelevanceClassifier;
pub use dedup::Deduplicator;
pub use ranking::rank_by_recency;
pub use aggregator::{AggregationReport, NewsAggregator, SourceOutcome, SourceStatus};
pub use output::{JsonWriter, NewsDocument};
pub use scheduler::{Scheduler, SchedulerStats};
