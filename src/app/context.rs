use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{NewsApiClient, NewsSource};
use crate::app::error::{HeadlinesError, Result};
use crate::config::Config;
use crate::repository::NewsRepository;
use crate::store::sqlite::SqliteStore;
use crate::viewmodel::NewsViewModel;

/// Everything a screen or command needs, built once at startup and passed
/// down explicitly.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub repository: Arc<NewsRepository>,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::assemble(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::assemble(config, store)
    }

    fn assemble(config: Config, store: Arc<SqliteStore>) -> Result<Self> {
        if config.api.resolved_api_key().is_none() {
            tracing::warn!("no news API key configured; requests will be rejected");
        }

        let source: Arc<dyn NewsSource + Send + Sync> = Arc::new(NewsApiClient::new(&config.api)?);
        let repository = Arc::new(NewsRepository::new(source, store.clone()));

        Ok(Self {
            config,
            store,
            repository,
        })
    }

    /// A fresh view model for one screen or command. Dropping it abandons
    /// whatever it still has in flight.
    pub fn view_model(&self) -> NewsViewModel {
        NewsViewModel::new(self.repository.clone(), self.config.api.country.clone())
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| HeadlinesError::Config("Could not find data directory".into()))?;
        let app_dir = data_dir.join("headlines");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("headlines.db"))
    }
}
