use serde::{Deserialize, Serialize};

use crate::app::{HeadlinesError, Result};
use crate::domain::{Article, Source};

/// Locally persisted projection of an [`Article`], keyed by URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
    pub url_to_image: Option<String>,
    pub source_name: Option<String>,
}

impl FavoriteRecord {
    /// Project the stored fields out of an article. Articles without a URL
    /// cannot be favorited.
    pub fn from_article(article: &Article) -> Result<Self> {
        let url = article.key().ok_or(HeadlinesError::MissingUrl)?;
        Ok(Self {
            url: url.to_string(),
            title: article.title.clone(),
            description: article.description.clone(),
            published_at: article.published_at.clone(),
            url_to_image: article.url_to_image.clone(),
            source_name: article.source_name().map(String::from),
        })
    }
}

impl From<FavoriteRecord> for Article {
    fn from(record: FavoriteRecord) -> Self {
        Article {
            url: Some(record.url),
            title: record.title,
            description: record.description,
            published_at: record.published_at,
            url_to_image: record.url_to_image,
            source: Some(Source {
                id: None,
                name: record.source_name,
            }),
            is_favorite: true,
            ..Default::default()
        }
    }
}
