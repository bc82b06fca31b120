//! Helpers for the `publishedAt` strings the news API hands back.
//!
//! The API promises `yyyy-MM-ddTHH:mm:ssZ`, but the value is stored and
//! compared as text. Anything that parses is rewritten to one fixed-width UTC
//! form so that lexical order and chronological order agree.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::Article;

const FIXED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn parse_published_at(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Rewrite a parseable timestamp as `YYYY-MM-DDTHH:MM:SSZ` in UTC.
/// Unparseable input is returned unchanged.
pub fn normalize_published_at(s: &str) -> String {
    parse_published_at(s)
        .map(|dt| dt.format(FIXED_FORMAT).to_string())
        .unwrap_or_else(|| s.to_string())
}

/// Sort newest first by parsed timestamp. Missing or unparseable dates go last,
/// ties keep their incoming order.
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by_cached_key(|article| std::cmp::Reverse(article.published_timestamp()));
}
