//! Per-row favorite indicators.
//!
//! Each visible URL gets its own existence observer. Values are cached here
//! and only URLs whose value actually changed are reported back, so the list
//! updates single rows instead of re-querying the whole table each frame.
//! The cache can lag a write until the observer delivers.

use std::collections::HashMap;

use tokio::sync::watch;

#[derive(Default)]
pub struct FavoriteMarks {
    marks: HashMap<String, bool>,
    watchers: HashMap<String, watch::Receiver<bool>>,
}

impl FavoriteMarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing any URLs not yet tracked and stop observing the rest.
    /// Returns URLs whose cached value changed as a result.
    pub fn track<'a, I, F>(&mut self, urls: I, mut observe: F) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
        F: FnMut(&str) -> watch::Receiver<bool>,
    {
        let wanted: Vec<&str> = urls.into_iter().collect();

        // Dropping a receiver ends its observer task.
        self.watchers.retain(|url, _| wanted.iter().any(|w| *w == url.as_str()));
        self.marks.retain(|url, _| wanted.iter().any(|w| *w == url.as_str()));

        let mut changed = Vec::new();
        for url in wanted {
            if self.watchers.contains_key(url) {
                continue;
            }
            let mut rx = observe(url);
            let value = *rx.borrow_and_update();
            if self.update(url, value) {
                changed.push(url.to_string());
            }
            self.watchers.insert(url.to_string(), rx);
        }
        changed
    }

    /// Pull any delivered values. Returns URLs whose cached value changed.
    pub fn poll(&mut self) -> Vec<String> {
        let delivered: Vec<(String, bool)> = self
            .watchers
            .iter_mut()
            .filter(|(_, rx)| rx.has_changed().unwrap_or(false))
            .map(|(url, rx)| (url.clone(), *rx.borrow_and_update()))
            .collect();

        delivered
            .into_iter()
            .filter_map(|(url, value)| self.update(&url, value).then_some(url))
            .collect()
    }

    /// Optimistic flip applied right after the user toggles.
    pub fn set(&mut self, url: &str, value: bool) -> bool {
        self.update(url, value)
    }

    pub fn is_favorite(&self, url: &str) -> bool {
        self.marks.get(url).copied().unwrap_or(false)
    }

    pub fn tracked(&self) -> usize {
        self.watchers.len()
    }

    fn update(&mut self, url: &str, value: bool) -> bool {
        if self.marks.get(url) == Some(&value) {
            return false;
        }
        self.marks.insert(url.to_string(), value);
        true
    }
}
