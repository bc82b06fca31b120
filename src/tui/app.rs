use ratatui::widgets::ListState;
use tokio::sync::watch;

use crate::domain::{Article, Category, FavoriteRecord};
use crate::tui::marks::FavoriteMarks;
use crate::viewmodel::NewsState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Sections,
    Articles,
    Detail,
}

impl ActivePane {
    pub fn next(self) -> Self {
        match self {
            ActivePane::Sections => ActivePane::Articles,
            ActivePane::Articles => ActivePane::Detail,
            ActivePane::Detail => ActivePane::Sections,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActivePane::Sections => ActivePane::Detail,
            ActivePane::Articles => ActivePane::Sections,
            ActivePane::Detail => ActivePane::Articles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Headlines,
    Favorites,
}

/// One entry of the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    All,
    Category(Category),
    Favorites,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Section::All => "All",
            Section::Category(c) => c.label(),
            Section::Favorites => "Favorites",
        }
    }
}

pub const PAGE_SIZE: usize = 10;

pub struct TuiApp {
    pub active_pane: ActivePane,
    pub screen: Screen,
    pub sections: Vec<Section>,
    pub section_index: usize,
    /// `None` until a category is picked, and again after "All".
    pub current_category: Option<Category>,
    pub news: NewsState,
    pub favorites: Vec<Article>,
    pub marks: FavoriteMarks,
    pub article_index: usize,
    pub detail_scroll: u16,
    /// Text being typed while the search box is open.
    pub search_input: Option<String>,
    pub last_query: Option<String>,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub maximized: bool,
    pub section_list_state: ListState,
    pub article_list_state: ListState,
}

impl TuiApp {
    pub fn new() -> Self {
        let mut section_list_state = ListState::default();
        section_list_state.select(Some(0));
        let mut article_list_state = ListState::default();
        article_list_state.select(Some(0));

        let sections = std::iter::once(Section::All)
            .chain(Category::ALL.into_iter().map(Section::Category))
            .chain(std::iter::once(Section::Favorites))
            .collect();

        Self {
            active_pane: ActivePane::Articles,
            screen: Screen::Headlines,
            sections,
            section_index: 0,
            current_category: None,
            news: NewsState::default(),
            favorites: Vec::new(),
            marks: FavoriteMarks::new(),
            article_index: 0,
            detail_scroll: 0,
            search_input: None,
            last_query: None,
            should_quit: false,
            status_message: None,
            maximized: false,
            section_list_state,
            article_list_state,
        }
    }

    /// Rows of whichever list the current screen shows.
    pub fn articles(&self) -> &[Article] {
        match self.screen {
            Screen::Headlines => &self.news.articles,
            Screen::Favorites => &self.favorites,
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.articles().get(self.article_index)
    }

    pub fn selected_section(&self) -> Option<Section> {
        self.sections.get(self.section_index).copied()
    }

    /// Replace the headline snapshot. Returns true when the rows changed, so
    /// the caller knows to re-track favorite marks.
    pub fn apply_news(&mut self, state: NewsState) -> bool {
        let rows_changed = state.articles.len() != self.news.articles.len()
            || state
                .articles
                .iter()
                .zip(&self.news.articles)
                .any(|(a, b)| a.url != b.url || a.title != b.title);
        self.news = state;
        for article in &mut self.news.articles {
            let marked = article.key().is_some_and(|url| self.marks.is_favorite(url));
            article.is_favorite = marked;
        }
        if rows_changed && self.screen == Screen::Headlines {
            self.reset_selection();
        }
        rows_changed
    }

    pub fn apply_favorites(&mut self, records: &[FavoriteRecord]) {
        self.favorites = records.iter().cloned().map(Article::from).collect();
        if self.screen == Screen::Favorites {
            self.clamp_selection();
        }
    }

    /// Observe the favorite state of every visible headline.
    pub fn track_marks<F>(&mut self, observe: F)
    where
        F: FnMut(&str) -> watch::Receiver<bool>,
    {
        let urls: Vec<String> = self
            .news
            .articles
            .iter()
            .filter_map(|a| a.key().map(String::from))
            .collect();
        let changed = self.marks.track(urls.iter().map(String::as_str), observe);
        self.refresh_rows(&changed);
    }

    /// Pull observer updates into the rows they belong to.
    pub fn poll_marks(&mut self) -> usize {
        let changed = self.marks.poll();
        self.refresh_rows(&changed);
        changed.len()
    }

    /// Flip the marker immediately, ahead of the store confirming it.
    pub fn mark_favorite(&mut self, url: &str, value: bool) {
        if self.marks.set(url, value) {
            self.refresh_rows(&[url.to_string()]);
        }
    }

    fn refresh_rows(&mut self, urls: &[String]) {
        if urls.is_empty() {
            return;
        }
        for article in &mut self.news.articles {
            let marked = match article.key() {
                Some(url) if urls.iter().any(|u| u == url) => self.marks.is_favorite(url),
                _ => continue,
            };
            article.is_favorite = marked;
        }
    }

    pub fn show_favorites(&mut self) {
        self.screen = Screen::Favorites;
        self.active_pane = ActivePane::Articles;
        self.reset_selection();
    }

    pub fn show_headlines(&mut self) {
        self.screen = Screen::Headlines;
        self.reset_selection();
    }

    pub fn open_search(&mut self) {
        self.search_input = Some(String::new());
    }

    pub fn is_searching(&self) -> bool {
        self.search_input.is_some()
    }

    /// Close the box and hand back a non-blank query, if any.
    pub fn submit_search(&mut self) -> Option<String> {
        let query = self.search_input.take()?;
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.last_query = Some(query.to_string());
        Some(query.to_string())
    }

    pub fn cancel_search(&mut self) {
        self.search_input = None;
        self.last_query = None;
    }

    pub fn list_title(&self) -> String {
        match self.screen {
            Screen::Favorites => "Favorites".to_string(),
            Screen::Headlines => match (&self.last_query, self.current_category) {
                (Some(query), _) => format!("Search: {}", query),
                (None, Some(category)) => category.label().to_string(),
                (None, None) => "Headlines".to_string(),
            },
        }
    }

    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Sections => {
                if self.section_index > 0 {
                    self.section_index -= 1;
                    self.section_list_state.select(Some(self.section_index));
                }
            }
            ActivePane::Articles => {
                if self.article_index > 0 {
                    self.select_article(self.article_index - 1);
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
        }
    }

    pub fn move_down(&mut self) {
        match self.active_pane {
            ActivePane::Sections => {
                if self.section_index + 1 < self.sections.len() {
                    self.section_index += 1;
                    self.section_list_state.select(Some(self.section_index));
                }
            }
            ActivePane::Articles => {
                if self.article_index + 1 < self.articles().len() {
                    self.select_article(self.article_index + 1);
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
        }
    }

    pub fn next_page(&mut self) {
        match self.active_pane {
            ActivePane::Sections => {
                self.section_index =
                    (self.section_index + PAGE_SIZE).min(self.sections.len().saturating_sub(1));
                self.section_list_state.select(Some(self.section_index));
            }
            ActivePane::Articles => {
                let max_index = self.articles().len().saturating_sub(1);
                let new_index = (self.article_index + PAGE_SIZE).min(max_index);
                if new_index != self.article_index {
                    self.select_article(new_index);
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_add(PAGE_SIZE as u16);
            }
        }
    }

    pub fn prev_page(&mut self) {
        match self.active_pane {
            ActivePane::Sections => {
                self.section_index = self.section_index.saturating_sub(PAGE_SIZE);
                self.section_list_state.select(Some(self.section_index));
            }
            ActivePane::Articles => {
                let new_index = self.article_index.saturating_sub(PAGE_SIZE);
                if new_index != self.article_index {
                    self.select_article(new_index);
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_sub(PAGE_SIZE as u16);
            }
        }
    }

    pub fn toggle_maximize(&mut self) {
        self.maximized = !self.maximized;
        if self.maximized {
            self.active_pane = ActivePane::Detail;
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    fn select_article(&mut self, index: usize) {
        self.article_index = index;
        self.article_list_state.select(Some(index));
        self.detail_scroll = 0;
    }

    fn reset_selection(&mut self) {
        self.select_article(0);
    }

    fn clamp_selection(&mut self) {
        let len = self.articles().len();
        if self.article_index >= len {
            self.select_article(len.saturating_sub(1));
        }
    }
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}
