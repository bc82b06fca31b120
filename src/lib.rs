//! # Headlines
//!
//! A terminal news reader. Headlines come from a NewsAPI-compatible search
//! service; favorites are kept in a local SQLite table keyed by article URL.
//!
//! ## Architecture
//!
//! ```text
//! NewsSource ────┐
//!                ├→ NewsRepository → NewsViewModel → TUI / CLI
//! FavoriteStore ─┘
//! ```
//!
//! - [`api`]: HTTP client for the remote search service
//! - [`store`]: SQLite persistence for favorites, with change notification
//! - [`repository`]: One entry point over both, returning `Result`
//! - [`viewmodel`]: Observable loading/error/articles state
//! - [`tui`]: Terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! export NEWS_API_KEY=...
//!
//! # Top headlines for a category
//! headlines top --category technology
//!
//! # Search
//! headlines search "rust language"
//!
//! # Launch TUI
//! headlines
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// the API client and the repository.
pub mod app;

/// Remote news source.
///
/// - [`NewsSource`](api::NewsSource): Async trait over the three endpoints
/// - [`NewsApiClient`](api::NewsApiClient): reqwest-based implementation
pub mod api;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/headlines/config.toml`, supporting:
/// - API endpoint, key, country and default query
/// - Categories for the bulk refresh
/// - Custom colors (named or hex)
/// - Custom keybindings
pub mod config;

/// Core domain models.
///
/// - [`Article`](domain::Article): One story as the API returns it
/// - [`FavoriteRecord`](domain::FavoriteRecord): The persisted subset
/// - [`Category`](domain::Category): Top-headline categories
pub mod domain;

/// Single entry point over the news source and the favorites store.
///
/// [`NewsRepository`](repository::NewsRepository) returns `Result` from every
/// fetch and exposes favorites as `watch` receivers that follow writes.
pub mod repository;

/// SQLite persistence layer.
///
/// - [`FavoriteStore`](store::FavoriteStore): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Terminal user interface.
///
/// Drawer, article list and detail pane. Keybindings: j/k navigate, Tab
/// cycles panes, f toggles a favorite, / searches, R refreshes, q quits.
pub mod tui;

/// Observable screen state.
///
/// [`NewsViewModel`](viewmodel::NewsViewModel) publishes
/// [`NewsState`](viewmodel::NewsState) on a `watch` channel. Only the latest
/// fetch publishes its result.
pub mod viewmodel;

#[cfg(test)]
mod testing;
