use serde::Deserialize;

pub const API_KEY_ENV: &str = "NEWS_API_KEY";

/// Connection settings for the news API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Country code sent with every top-headlines request.
    pub country: String,
    /// Query for the initial "everything" feed.
    pub default_query: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2/".to_string(),
            api_key: None,
            country: "us".to_string(),
            default_query: "us".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    /// `NEWS_API_KEY` wins over the config file.
    pub fn resolved_api_key(&self) -> Option<String> {
        Self::pick_key(std::env::var(API_KEY_ENV).ok(), self.api_key.clone())
    }

    fn pick_key(from_env: Option<String>, from_file: Option<String>) -> Option<String> {
        from_env
            .filter(|k| !k.trim().is_empty())
            .or(from_file.filter(|k| !k.trim().is_empty()))
    }
}
