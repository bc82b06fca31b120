//! Scripted stand-ins for the trait seams, shared by unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{NewsResponse, NewsSource};
use crate::app::{HeadlinesError, Result};
use crate::domain::{Article, Category};
use crate::repository::NewsRepository;
use crate::store::SqliteStore;

#[derive(Debug, Clone)]
pub enum Reply {
    Articles(Vec<Article>),
    Status(u16, &'static str),
    Malformed,
}

/// A `NewsSource` answering from a table keyed by `top:<category>`,
/// `search:<query>` or `everything:<query>`. Unknown keys answer 404.
/// A key may be given a delay before it answers.
#[derive(Default)]
pub struct ScriptedSource {
    replies: HashMap<String, Reply>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, reply: Reply) -> Self {
        self.replies.insert(key.to_string(), reply);
        self
    }

    pub fn delayed(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(&self, key: String) -> Result<NewsResponse> {
        self.calls.lock().unwrap().push(key.clone());
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        match self.replies.get(&key) {
            Some(Reply::Articles(articles)) => Ok(NewsResponse {
                total_results: Some(articles.len() as u32),
                status: Some("ok".into()),
                articles: Some(articles.iter().cloned().map(Some).collect()),
                ..Default::default()
            }),
            Some(Reply::Status(code, reason)) => Err(HeadlinesError::Status {
                code: *code,
                reason: reason.to_string(),
            }),
            Some(Reply::Malformed) => {
                Err(HeadlinesError::MalformedBody("empty response body".into()))
            }
            None => Err(HeadlinesError::Status {
                code: 404,
                reason: "Not Found".into(),
            }),
        }
    }
}

#[async_trait]
impl NewsSource for ScriptedSource {
    async fn top_headlines(&self, _country: &str, category: Category) -> Result<NewsResponse> {
        self.answer(format!("top:{}", category)).await
    }

    async fn search(&self, query: &str) -> Result<NewsResponse> {
        self.answer(format!("search:{}", query)).await
    }

    async fn everything(&self, query: &str) -> Result<NewsResponse> {
        self.answer(format!("everything:{}", query)).await
    }
}

pub fn article(url: &str, published_at: &str) -> Article {
    Article {
        url: Some(url.into()),
        title: Some(format!("Story at {}", url)),
        published_at: Some(published_at.into()),
        ..Default::default()
    }
}

pub fn repository(source: ScriptedSource) -> (Arc<NewsRepository>, Arc<ScriptedSource>) {
    let source = Arc::new(source);
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let repository = Arc::new(NewsRepository::new(source.clone(), store));
    (repository, source)
}
