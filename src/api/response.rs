use serde::Deserialize;

use crate::domain::Article;

/// Envelope returned by every endpoint. Error responses reuse it and fill
/// `code` and `message` instead of `articles`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub total_results: Option<u32>,
    pub status: Option<String>,
    pub articles: Option<Vec<Option<Article>>>,
    pub code: Option<String>,
    pub message: Option<String>,
}

impl NewsResponse {
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }

    /// Articles with null entries dropped.
    pub fn into_articles(self) -> Vec<Article> {
        self.articles
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect()
    }
}
