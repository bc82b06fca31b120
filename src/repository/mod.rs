//! One entry point over the remote news source and the local favorites table.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use crate::api::{NewsResponse, NewsSource};
use crate::app::{HeadlinesError, Result};
use crate::domain::{Article, Category, FavoriteRecord};
use crate::store::FavoriteStore;

pub struct NewsRepository {
    source: Arc<dyn NewsSource + Send + Sync>,
    store: Arc<dyn FavoriteStore + Send + Sync>,
}

impl NewsRepository {
    pub fn new(
        source: Arc<dyn NewsSource + Send + Sync>,
        store: Arc<dyn FavoriteStore + Send + Sync>,
    ) -> Self {
        Self { source, store }
    }

    pub async fn fetch_everything(&self, query: &str) -> Result<Vec<Article>> {
        self.source
            .everything(query)
            .await
            .map(NewsResponse::into_articles)
            .inspect_err(|e| warn!(query, error = %e, "everything request failed"))
    }

    pub async fn fetch_by_category(&self, category: Category, country: &str) -> Result<Vec<Article>> {
        self.source
            .top_headlines(country, category)
            .await
            .map(NewsResponse::into_articles)
            .inspect_err(|e| warn!(%category, country, error = %e, "top headlines request failed"))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Article>> {
        self.source
            .search(query)
            .await
            .map(NewsResponse::into_articles)
            .inspect_err(|e| warn!(query, error = %e, "search request failed"))
    }

    pub fn save_favorite(&self, article: &Article) -> Result<()> {
        let record = FavoriteRecord::from_article(article)?;
        self.store.insert_favorite(&record)
    }

    pub fn remove_favorite(&self, article: &Article) -> Result<()> {
        let url = article.key().ok_or(HeadlinesError::MissingUrl)?;
        self.remove_favorite_url(url)
    }

    pub fn remove_favorite_url(&self, url: &str) -> Result<()> {
        self.store.delete_favorite(url)?;
        Ok(())
    }

    pub fn list_favorites(&self) -> Result<Vec<FavoriteRecord>> {
        self.store.list_favorites()
    }

    pub fn is_favorite(&self, url: &str) -> Result<bool> {
        self.store.is_favorite(url)
    }

    /// Live existence flag for one URL.
    pub fn observe_favorite(&self, url: &str) -> watch::Receiver<bool> {
        let url = url.to_string();
        self.observe(move |store| store.is_favorite(&url))
    }

    /// Live view of the whole favorites list, newest first.
    pub fn observe_favorites(&self) -> watch::Receiver<Vec<FavoriteRecord>> {
        self.observe(|store| store.list_favorites())
    }

    /// Run `query` now and again after every store write, publishing only
    /// changed values. The task ends once every receiver is gone.
    ///
    /// Values arrive asynchronously, so a write is seen on some later
    /// delivery rather than necessarily the next one.
    fn observe<T, F>(&self, query: F) -> watch::Receiver<T>
    where
        T: PartialEq + Default + Send + Sync + 'static,
        F: Fn(&dyn FavoriteStore) -> Result<T> + Send + 'static,
    {
        let store = self.store.clone();
        // Subscribe before the first read so no write slips in between.
        let mut changes = store.subscribe();

        let initial = query(store.as_ref()).unwrap_or_else(|e| {
            warn!(error = %e, "favorites query failed");
            T::default()
        });
        let (tx, rx) = watch::channel(initial);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = tx.closed() => break,
                }

                match query(store.as_ref()) {
                    Ok(value) => {
                        tx.send_if_modified(|current| {
                            if *current == value {
                                false
                            } else {
                                *current = value;
                                true
                            }
                        });
                    }
                    Err(e) => warn!(error = %e, "favorites query failed"),
                }
            }
        });

        rx
    }
}
