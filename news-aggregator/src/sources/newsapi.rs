use crate::config::{LocalityConfig, NewsApiConfig};
use crate::traits::{NewsSource, SourceKind};
use crate::types::{AggregatorError, RawArticle, Result};
use crate::Fetcher;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_SOURCE_NAME: &str = "NewsAPI";

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    #[serde(default)]
    source: Option<NewsApiArticleSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticleSource {
    name: Option<String>,
}

impl From<NewsApiArticle> for RawArticle {
    fn from(article: NewsApiArticle) -> Self {
        let source = article
            .source
            .and_then(|s| s.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_string());

        RawArticle {
            title: article.title,
            description: article.description,
            url: article.url,
            image_url: article.url_to_image,
            published_at: article.published_at,
            source: Some(source),
            author: article.author,
            content: article.content,
            region: None,
        }
    }
}

/// Keyword search against the NewsAPI `everything` endpoint.
pub struct NewsApiSource {
    config: NewsApiConfig,
    query: String,
    fetcher: Arc<Fetcher>,
}

impl NewsApiSource {
    pub fn new(config: NewsApiConfig, locality: &LocalityConfig, fetcher: Arc<Fetcher>) -> Self {
        Self {
            config,
            query: locality.search_query.clone(),
            fetcher,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn query_params(&self, api_key: &str) -> Vec<(&'static str, String)> {
        let from = (Utc::now() - Duration::days(self.config.window_days))
            .format("%Y-%m-%d")
            .to_string();

        vec![
            ("q", self.query.clone()),
            ("apiKey", api_key.to_string()),
            ("language", "en".to_string()),
            ("sortBy", "publishedAt".to_string()),
            ("pageSize", self.config.page_size.to_string()),
            ("from", from),
        ]
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn source_name(&self) -> String {
        DEFAULT_SOURCE_NAME.to_string()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Search
    }

    async fn pull(&self) -> Result<Vec<RawArticle>> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("No NewsAPI key configured, skipping search source");
            return Ok(Vec::new());
        };

        info!("Fetching from NewsAPI");

        let url = format!("{}/everything", self.config.endpoint.trim_end_matches('/'));
        let params = self.query_params(api_key);
        let timeout = std::time::Duration::from_secs(self.config.timeout_seconds);

        let response: NewsApiResponse = self.fetcher.get_json(&url, &params, timeout).await?;

        if response.status != "ok" {
            return Err(AggregatorError::Api {
                status: response.code.unwrap_or(response.status),
                message: response
                    .message
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        let articles: Vec<RawArticle> = response.articles.into_iter().map(RawArticle::from).collect();
        info!("Pulled {} articles from NewsAPI", articles.len());
        Ok(articles)
    }
}
