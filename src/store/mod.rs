pub mod changes;
pub mod sqlite;

use tokio::sync::watch;

use crate::app::Result;
use crate::domain::FavoriteRecord;

pub use changes::ChangeFeed;
pub use sqlite::SqliteStore;

pub trait FavoriteStore {
    /// Insert or replace the record for `favorite.url`.
    fn insert_favorite(&self, favorite: &FavoriteRecord) -> Result<()>;
    /// Returns whether a row was removed.
    fn delete_favorite(&self, url: &str) -> Result<bool>;
    /// All favorites, newest `published_at` first.
    fn list_favorites(&self) -> Result<Vec<FavoriteRecord>>;
    fn get_favorite(&self, url: &str) -> Result<Option<FavoriteRecord>>;
    fn is_favorite(&self, url: &str) -> Result<bool>;
    fn favorite_count(&self) -> Result<i64>;

    /// Counter bumped after each committed write. Observers re-query when it moves.
    fn subscribe(&self) -> watch::Receiver<u64>;
}
