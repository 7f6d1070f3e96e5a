use crate::types::{Article, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub region: String,
    pub generated_at: String,
    pub total_articles: usize,
}

/// The document handed to the writer at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsDocument {
    pub metadata: DocumentMetadata,
    pub articles: Vec<Article>,
}

impl NewsDocument {
    pub fn from_articles(
        locality_name: &str,
        generated_at: DateTime<Local>,
        articles: Vec<Article>,
    ) -> Self {
        Self {
            metadata: DocumentMetadata {
                region: locality_name.to_string(),
                generated_at: generated_at.to_rfc3339(),
                total_articles: articles.len(),
            },
            articles,
        }
    }
}

/// Writes documents as pretty-printed UTF-8 JSON.
#[derive(Debug, Clone)]
pub struct JsonWriter {
    path: PathBuf,
}

impl JsonWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, document: &NewsDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, json)?;

        info!("Saved {} articles to {}", document.metadata.total_articles, self.path.display());
        Ok(())
    }
}
