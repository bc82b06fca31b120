use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};
use tokio::sync::watch;
use tracing::debug;

use crate::app::{HeadlinesError, Result};
use crate::domain::{normalize_published_at, FavoriteRecord};
use crate::store::{ChangeFeed, FavoriteStore};

const FAVORITE_COLUMNS: &str =
    "url, title, description, published_at, url_to_image, source_name";

pub struct SqliteStore {
    conn: Mutex<Connection>,
    changes: ChangeFeed,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
            changes: ChangeFeed::new(),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| HeadlinesError::Migration(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| HeadlinesError::Store(e.to_string()))
    }

    fn map_favorite(row: &Row<'_>) -> rusqlite::Result<FavoriteRecord> {
        Ok(FavoriteRecord {
            url: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            published_at: row.get(3)?,
            url_to_image: row.get(4)?,
            source_name: row.get(5)?,
        })
    }
}

impl FavoriteStore for SqliteStore {
    fn insert_favorite(&self, favorite: &FavoriteRecord) -> Result<()> {
        {
            let conn = self.lock()?;
            conn.execute(
                "INSERT OR REPLACE INTO favorite_news
                 (url, title, description, published_at, url_to_image, source_name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    favorite.url,
                    favorite.title,
                    favorite.description,
                    favorite.published_at.as_deref().map(normalize_published_at),
                    favorite.url_to_image,
                    favorite.source_name
                ],
            )?;
        }

        debug!(url = %favorite.url, "favorite saved");
        self.changes.notify();
        Ok(())
    }

    fn delete_favorite(&self, url: &str) -> Result<bool> {
        let removed = {
            let conn = self.lock()?;
            conn.execute("DELETE FROM favorite_news WHERE url = ?1", params![url])?
        };

        if removed > 0 {
            debug!(url, "favorite removed");
            self.changes.notify();
        }
        Ok(removed > 0)
    }

    fn list_favorites(&self) -> Result<Vec<FavoriteRecord>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorite_news
             ORDER BY published_at GLOB '[0-9]*' DESC, published_at DESC, url ASC"
        ))?;

        let favorites = stmt
            .query_map([], Self::map_favorite)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(favorites)
    }

    fn get_favorite(&self, url: &str) -> Result<Option<FavoriteRecord>> {
        let conn = self.lock()?;

        let result = conn
            .query_row(
                &format!("SELECT {FAVORITE_COLUMNS} FROM favorite_news WHERE url = ?1"),
                params![url],
                Self::map_favorite,
            )
            .optional()?;

        Ok(result)
    }

    fn is_favorite(&self, url: &str) -> Result<bool> {
        let conn = self.lock()?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM favorite_news WHERE url = ?1)",
            params![url],
            |row| row.get(0),
        )?;

        Ok(exists)
    }

    fn favorite_count(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM favorite_news", [], |row| row.get(0))?;
        Ok(count)
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}
