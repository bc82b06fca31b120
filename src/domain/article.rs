use chrono::{DateTime, Utc};
use html_escape::decode_html_entities;
use serde::{Deserialize, Serialize};

use crate::domain::published::parse_published_at;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// A news item as returned by the API. Every remote field may be absent.
///
/// `category` and `is_favorite` never come from the wire; the view model
/// assigns them after a fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<String>,
    pub url_to_image: Option<String>,
    pub source: Option<Source>,
    #[serde(skip)]
    pub category: Option<String>,
    #[serde(skip)]
    pub is_favorite: bool,
}

impl Article {
    /// URL if present and non-blank.
    pub fn key(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }

    pub fn display_title(&self) -> String {
        self.title
            .as_deref()
            .map(|t| decode_html_entities(t).into_owned())
            .unwrap_or_else(|| "(Untitled)".to_string())
    }

    pub fn display_author(&self) -> &str {
        self.author.as_deref().unwrap_or("Unknown")
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.name.as_deref())
    }

    pub fn display_category(&self) -> String {
        self.category.as_deref().unwrap_or("general").to_uppercase()
    }

    pub fn display_description(&self) -> String {
        self.description
            .as_deref()
            .map(|d| decode_html_entities(d).into_owned())
            .unwrap_or_default()
    }

    /// Body text only. The description is shown separately.
    pub fn display_content(&self) -> String {
        self.content
            .as_deref()
            .map(|c| decode_html_entities(c).into_owned())
            .unwrap_or_default()
    }

    pub fn published_timestamp(&self) -> Option<DateTime<Utc>> {
        self.published_at.as_deref().and_then(parse_published_at)
    }

    /// `Mar 05, 2024 • 14:30`, or the raw string when it does not parse.
    pub fn display_date(&self) -> String {
        match (self.published_timestamp(), self.published_at.as_deref()) {
            (Some(dt), _) => dt.format("%b %d, %Y • %H:%M").to_string(),
            (None, Some(raw)) => raw.to_string(),
            (None, None) => String::new(),
        }
    }
}
