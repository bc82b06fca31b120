use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::api::{NewsResponse, NewsSource};
use crate::app::{HeadlinesError, Result};
use crate::config::ApiConfig;
use crate::domain::Category;

const USER_AGENT: &str = concat!("headlines/", env!("CARGO_PKG_VERSION"));

pub struct NewsApiClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(&config.base_url)?,
            api_key: config.resolved_api_key().unwrap_or_default(),
        })
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<NewsResponse> {
        let url = build_endpoint(&self.base_url, path, params, &self.api_key)?;
        // Logged before the key is attached.
        debug!(path, ?params, "GET news endpoint");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        decode_response(status, &body)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn top_headlines(&self, country: &str, category: Category) -> Result<NewsResponse> {
        self.get(
            "top-headlines",
            &[("country", country), ("category", category.as_str())],
        )
        .await
    }

    async fn search(&self, query: &str) -> Result<NewsResponse> {
        self.get("everything", &[("q", query)]).await
    }

    async fn everything(&self, query: &str) -> Result<NewsResponse> {
        self.get("everything", &[("q", query)]).await
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Ok(Url::parse(&raw)?)
}

fn build_endpoint(base: &Url, path: &str, params: &[(&str, &str)], api_key: &str) -> Result<Url> {
    let mut url = base.join(path)?;
    url.query_pairs_mut()
        .extend_pairs(params.iter())
        .append_pair("apiKey", api_key);
    Ok(url)
}

/// Collapse status, empty body, bad JSON and in-band API errors into one
/// `Result`.
fn decode_response(status: StatusCode, body: &[u8]) -> Result<NewsResponse> {
    if !status.is_success() {
        let reason = serde_json::from_slice::<NewsResponse>(body)
            .ok()
            .and_then(|r| r.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
        return Err(HeadlinesError::Status {
            code: status.as_u16(),
            reason,
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(HeadlinesError::MalformedBody("empty response body".into()));
    }

    let response: NewsResponse = serde_json::from_slice(body)
        .map_err(|e| HeadlinesError::MalformedBody(e.to_string()))?;

    if response.is_error() {
        return Err(HeadlinesError::Api {
            code: response.code.unwrap_or_default(),
            message: response.message.unwrap_or_default(),
        });
    }

    Ok(response)
}
