use crate::types::FetchConfig;
use std::env;

pub const DEFAULT_NEWSAPI_ENDPOINT: &str = "https://newsapi.org/v2";

/// Everything the aggregator knows about its target locality.
///
/// `region_table` is ordered: sub-area keywords come before the broader
/// province keyword so overlapping matches resolve to the most specific label.
#[derive(Debug, Clone)]
pub struct LocalityConfig {
    pub name: String,
    pub keywords: Vec<String>,
    pub region_table: Vec<(String, String)>,
    pub search_query: String,
}

impl LocalityConfig {
    pub fn butuan() -> Self {
        let keywords = [
            "butuan",
            "agusan del norte",
            "libertad",
            "bancasi",
            "ampayon",
            "langihan",
            "baan",
            "doongan",
            "tiniwisan",
            "golden ribbon",
            "bading",
            "downtown butuan",
            "balangay",
            "agusan river",
            "guingona park",
        ];

        let region_table = [
            ("libertad", "Libertad"),
            ("bancasi", "Bancasi"),
            ("ampayon", "Ampayon"),
            ("langihan", "Langihan"),
            ("baan", "Baan"),
            ("doongan", "Doongan"),
            ("tiniwisan", "Tiniwisan"),
            ("golden ribbon", "Golden Ribbon"),
            ("bading", "Bading"),
            ("downtown", "Downtown"),
            ("agusan", "Agusan del Norte"),
        ];

        Self {
            name: "Butuan City".to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            region_table: region_table
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            search_query: r#""Butuan City" OR "Butuan City news" OR "Butuan Philippines""#
                .to_string(),
        }
    }
}

/// One named RSS feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSpec {
    pub name: String,
    pub url: String,
}

impl FeedSpec {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewsApiConfig {
    /// No key means the search source is skipped entirely.
    pub api_key: Option<String>,
    pub endpoint: String,
    pub page_size: u32,
    pub window_days: i64,
    pub timeout_seconds: u64,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_NEWSAPI_ENDPOINT.to_string(),
            page_size: 30,
            window_days: 7,
            timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourcesConfig {
    /// Feeds in fetch order; this order also decides dedup precedence.
    pub feeds: Vec<FeedSpec>,
    pub max_entries_per_feed: usize,
    pub newsapi: NewsApiConfig,
}

impl SourcesConfig {
    pub fn butuan_feeds() -> Vec<FeedSpec> {
        vec![
            FeedSpec::new("Bombo Radyo Butuan", "https://butuan.bomboradyo.com/feed/"),
            FeedSpec::new(
                "MindaNews Butuan",
                "https://mindanews.com/tag/butuan-city-news/feed/",
            ),
            FeedSpec::new(
                "Mindanaogoldstardaily",
                "https://mindanaogoldstardaily.com/archives/category/butuan/feed/",
            ),
            FeedSpec::new(
                "Brigada News Butuan",
                "https://www.brigadanews.ph/bnfm-butuan/feed/",
            ),
            FeedSpec::new(
                "Google News Butuan",
                "https://news.google.com/rss/search?q=Butuan+City+Philippines&hl=en-PH&gl=PH&ceid=PH:en",
            ),
        ]
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            feeds: Self::butuan_feeds(),
            max_entries_per_feed: 20,
            newsapi: NewsApiConfig::default(),
        }
    }
}

/// Process-wide configuration, built once at start-up and passed down.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub locality: LocalityConfig,
    pub sources: SourcesConfig,
    pub fetch: FetchConfig,
    pub max_concurrent_fetches: usize,
    pub source_timeout_seconds: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            locality: LocalityConfig::butuan(),
            sources: SourcesConfig::default(),
            fetch: FetchConfig::default(),
            max_concurrent_fetches: 4,
            source_timeout_seconds: 60,
        }
    }
}

impl AggregatorConfig {
    /// Defaults overlaid with `NEWSAPI_KEY` and `NEWSAPI_ENDPOINT`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.sources.newsapi.api_key = env::var("NEWSAPI_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if let Ok(endpoint) = env::var("NEWSAPI_ENDPOINT") {
            let endpoint = endpoint.trim();
            if !endpoint.is_empty() {
                config.sources.newsapi.endpoint = endpoint.trim_end_matches('/').to_string();
            }
        }

        config
    }
}
