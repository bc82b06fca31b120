pub mod article;
pub mod category;
pub mod favorite;
pub mod published;

pub use article::{Article, Source};
pub use category::Category;
pub use favorite::FavoriteRecord;
pub use published::{normalize_published_at, parse_published_at, sort_newest_first};
