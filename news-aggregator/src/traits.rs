use crate::types::{RawArticle, Result};
use async_trait::async_trait;
use std::fmt;

/// What kind of upstream a source talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Rss,
    Search,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Rss => write!(f, "rss"),
            SourceKind::Search => write!(f, "search"),
        }
    }
}

/// Trait for pulling raw article records from one external source.
///
/// Implementations return `Err` for anything that went wrong upstream; the
/// aggregator turns that into an empty contribution for the run.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Human-readable name, also stamped on every record as its source.
    fn source_name(&self) -> String;

    fn kind(&self) -> SourceKind;

    /// Fetch the current batch of records.
    async fn pull(&self) -> Result<Vec<RawArticle>>;
}
