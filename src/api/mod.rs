pub mod client;
pub mod response;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::Category;

pub use client::NewsApiClient;
pub use response::NewsResponse;

/// Read-only access to the remote news service.
#[async_trait]
pub trait NewsSource {
    /// Top headlines for one category in one country.
    async fn top_headlines(&self, country: &str, category: Category) -> Result<NewsResponse>;

    /// Free-text search, as issued from the search box.
    async fn search(&self, query: &str) -> Result<NewsResponse>;

    /// The "everything" feed used for the initial screen.
    async fn everything(&self, query: &str) -> Result<NewsResponse>;
}
