use crate::config::LocalityConfig;
use crate::types::Article;

/// Keyword-based locality filter.
#[derive(Debug, Clone)]
pub struct RelevanceClassifier {
    keywords: Vec<String>,
}

impl RelevanceClassifier {
    pub fn new(locality: &LocalityConfig) -> Self {
        Self {
            keywords: locality
                .keywords
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// True when any locality keyword occurs in the title or description,
    /// ignoring case.
    pub fn is_relevant(&self, article: &Article) -> bool {
        let text = article.search_text();
        self.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
    }

    pub fn filter(&self, articles: Vec<Article>) -> Vec<Article> {
        articles
            .into_iter()
            .filter(|article| self.is_relevant(article))
            .collect()
    }
}
