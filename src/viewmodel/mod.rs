//! Observable screen state and the operations that drive it.
//!
//! Each fetch moves the state through loading to either new articles or an
//! error message. The previous articles survive a failed fetch. Work runs on
//! tasks owned by the view model and is aborted when it is dropped.
//!
//! Only the most recently started fetch may publish. An older fetch that
//! completes later is discarded, so `is_loading` stays set until the latest
//! one lands.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{oneshot, watch};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::app::Result;
use crate::domain::{sort_newest_first, Article, Category, FavoriteRecord};
use crate::repository::NewsRepository;

pub const EVERYTHING_LABEL: &str = "general";
pub const SEARCH_LABEL: &str = "search";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsState {
    pub articles: Vec<Article>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Set once any fetch has settled.
    pub loaded: bool,
}

impl NewsState {
    /// Placeholder for a settled, successful, empty result.
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.loaded && !self.is_loading && self.error.is_none() && self.articles.is_empty() {
            Some("No news found")
        } else {
            None
        }
    }
}

struct Inner {
    repository: Arc<NewsRepository>,
    country: String,
    state: watch::Sender<NewsState>,
    generation: AtomicU64,
}

pub struct NewsViewModel {
    inner: Arc<Inner>,
    tasks: Mutex<JoinSet<()>>,
}

impl NewsViewModel {
    pub fn new(repository: Arc<NewsRepository>, country: impl Into<String>) -> Self {
        let (state, _rx) = watch::channel(NewsState::default());
        Self {
            inner: Arc::new(Inner {
                repository,
                country: country.into(),
                state,
                generation: AtomicU64::new(0),
            }),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<NewsState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> NewsState {
        self.inner.state.borrow().clone()
    }

    // Spawning forms, used by the UI.

    pub fn get_everything(&self, query: impl Into<String>) {
        let query = query.into();
        self.spawn(move |inner| async move { inner.load_everything(&query).await });
    }

    pub fn get_news_by_category(&self, category: Category) {
        self.spawn(move |inner| async move { inner.load_by_category(category).await });
    }

    pub fn search_news(&self, query: impl Into<String>) {
        let query = query.into();
        self.spawn(move |inner| async move { inner.load_search(&query).await });
    }

    pub fn get_all_news(&self, categories: Vec<Category>) {
        self.spawn(move |inner| async move { inner.load_all_news(&categories).await });
    }

    // Awaitable forms, used by the CLI and tests.

    pub async fn load_everything(&self, query: &str) {
        self.inner.load_everything(query).await
    }

    pub async fn load_by_category(&self, category: Category) {
        self.inner.load_by_category(category).await
    }

    pub async fn load_search(&self, query: &str) {
        self.inner.load_search(query).await
    }

    pub async fn load_all_news(&self, categories: &[Category]) {
        self.inner.load_all_news(categories).await
    }

    /// Fire-and-forget save. The returned receiver reports completion and may
    /// be dropped.
    pub fn save_favorite(&self, article: Article) -> oneshot::Receiver<Result<()>> {
        self.spawn_write(move |repository| repository.save_favorite(&article))
    }

    pub fn remove_favorite(&self, article: Article) -> oneshot::Receiver<Result<()>> {
        self.spawn_write(move |repository| repository.remove_favorite(&article))
    }

    pub fn toggle_favorite(
        &self,
        article: Article,
        make_favorite: bool,
    ) -> oneshot::Receiver<Result<()>> {
        if make_favorite {
            self.save_favorite(article)
        } else {
            self.remove_favorite(article)
        }
    }

    pub fn favorites(&self) -> watch::Receiver<Vec<FavoriteRecord>> {
        self.inner.repository.observe_favorites()
    }

    pub fn is_favorite(&self, url: &str) -> watch::Receiver<bool> {
        self.inner.repository.observe_favorite(url)
    }

    fn spawn<F, Fut>(&self, work: F)
    where
        F: FnOnce(Arc<Inner>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let future = work(self.inner.clone());
        match self.tasks.lock() {
            Ok(mut tasks) => {
                // Reap finished tasks so the set does not grow without bound.
                while tasks.try_join_next().is_some() {}
                tasks.spawn(future);
            }
            Err(e) => warn!(error = %e, "task set poisoned, operation dropped"),
        }
    }

    fn spawn_write<F>(&self, write: F) -> oneshot::Receiver<Result<()>>
    where
        F: FnOnce(&NewsRepository) -> Result<()> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        self.spawn(move |inner| async move {
            let result = write(&inner.repository);
            if let Err(e) = &result {
                warn!(error = %e, "favorite update failed");
            }
            let _ = done_tx.send(result);
        });
        done_rx
    }
}

impl Inner {
    async fn load_everything(&self, query: &str) {
        let generation = self.begin();
        let result = self.repository.fetch_everything(query).await;
        self.finish(generation, result.map(|articles| label(articles, EVERYTHING_LABEL)));
    }

    async fn load_by_category(&self, category: Category) {
        let generation = self.begin();
        let result = self
            .repository
            .fetch_by_category(category, &self.country)
            .await;
        self.finish(generation, result.map(|articles| label(articles, category.as_str())));
    }

    async fn load_search(&self, query: &str) {
        let generation = self.begin();
        let result = self.repository.search(query).await;
        self.finish(generation, result.map(|articles| label(articles, SEARCH_LABEL)));
    }

    /// One request per category, in order. Succeeds when any category does.
    async fn load_all_news(&self, categories: &[Category]) {
        let generation = self.begin();

        let mut articles = Vec::new();
        let mut errors = Vec::new();
        let mut any_succeeded = false;

        for &category in categories {
            match self
                .repository
                .fetch_by_category(category, &self.country)
                .await
            {
                Ok(batch) => {
                    any_succeeded = true;
                    articles.extend(label(batch, category.as_str()));
                }
                Err(e) => errors.push(format!("{}: {}", category.label(), e)),
            }
        }

        self.publish(generation, |state| {
            if any_succeeded {
                sort_newest_first(&mut articles);
                state.articles = articles;
                state.error = None;
            } else if !errors.is_empty() {
                state.error = Some(errors.join("\n"));
            } else {
                state.error = Some("No news available".to_string());
            }
        });
    }

    /// Marks loading and returns the generation the caller publishes under.
    fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| state.is_loading = true);
        generation
    }

    fn finish(&self, generation: u64, result: Result<Vec<Article>>) {
        self.publish(generation, |state| match result {
            Ok(articles) => {
                state.articles = articles;
                state.error = None;
            }
            Err(e) => state.error = Some(e.to_string()),
        });
    }

    fn publish(&self, generation: u64, apply: impl FnOnce(&mut NewsState)) {
        // The generation is read under the watch lock, so a concurrent begin()
        // either lands before this check or marks loading after it.
        let published = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            apply(state);
            state.is_loading = false;
            state.loaded = true;
            true
        });
        if !published {
            debug!(generation, "discarding result of superseded fetch");
        }
    }
}

fn label(mut articles: Vec<Article>, category: &str) -> Vec<Article> {
    for article in &mut articles {
        article.category = Some(category.to_string());
    }
    articles
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;
    use tokio_test::assert_ok;

    use super::*;
    use crate::testing::{article, repository, Reply, ScriptedSource};

    fn view_model(source: ScriptedSource) -> NewsViewModel {
        let (repo, _) = repository(source);
        NewsViewModel::new(repo, "us")
    }

    fn urls(state: &NewsState) -> Vec<String> {
        state.articles.iter().filter_map(|a| a.url.clone()).collect()
    }

    /// Business answers after `business` and technology after `technology`.
    fn two_speed(
        business: Duration,
        technology: Duration,
    ) -> (NewsViewModel, Arc<ScriptedSource>) {
        let (repo, source) = repository(
            ScriptedSource::new()
                .with(
                    "top:business",
                    Reply::Articles(vec![article("https://e.com/b", "2024-01-01T00:00:00Z")]),
                )
                .delayed("top:business", business)
                .with(
                    "top:technology",
                    Reply::Articles(vec![article("https://e.com/t", "2024-01-01T00:00:00Z")]),
                )
                .delayed("top:technology", technology),
        );
        (NewsViewModel::new(repo, "us"), source)
    }

    async fn wait_for_calls(source: &ScriptedSource, n: usize) {
        let started = timeout(Duration::from_secs(2), async {
            while source.calls().len() < n {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await;
        assert!(started.is_ok());
    }

    #[tokio::test]
    async fn test_category_fetch_labels_articles() {
        let vm = view_model(ScriptedSource::new().with(
            "top:sports",
            Reply::Articles(vec![article("https://e.com/1", "2024-01-01T00:00:00Z")]),
        ));

        vm.load_by_category(Category::Sports).await;

        let state = vm.state();
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert_eq!(state.articles[0].category.as_deref(), Some("sports"));
    }

    #[tokio::test]
    async fn test_everything_and_search_labels() {
        let vm = view_model(
            ScriptedSource::new()
                .with(
                    "everything:us",
                    Reply::Articles(vec![article("https://e.com/1", "2024-01-01T00:00:00Z")]),
                )
                .with(
                    "search:rust",
                    Reply::Articles(vec![article("https://e.com/2", "2024-01-01T00:00:00Z")]),
                ),
        );

        vm.load_everything("us").await;
        assert_eq!(vm.state().articles[0].category.as_deref(), Some("general"));

        vm.load_search("rust").await;
        assert_eq!(vm.state().articles[0].category.as_deref(), Some("search"));
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_articles() {
        let vm = view_model(
            ScriptedSource::new()
                .with(
                    "everything:us",
                    Reply::Articles(vec![article("https://e.com/1", "2024-01-01T00:00:00Z")]),
                )
                .with("search:boom", Reply::Status(503, "Service Unavailable")),
        );

        vm.load_everything("us").await;
        vm.load_search("boom").await;

        let state = vm.state();
        assert_eq!(state.articles.len(), 1);
        assert_eq!(state.error.as_deref(), Some("Error: 503 - Service Unavailable"));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_success_clears_error() {
        let vm = view_model(ScriptedSource::new().with(
            "everything:us",
            Reply::Articles(vec![article("https://e.com/1", "2024-01-01T00:00:00Z")]),
        ));

        vm.load_search("unknown").await;
        assert!(vm.state().error.is_some());

        vm.load_everything("us").await;
        assert_eq!(vm.state().error, None);
    }

    #[tokio::test]
    async fn test_all_news_partial_failure_is_success() {
        let vm = view_model(
            ScriptedSource::new()
                .with("top:business", Reply::Status(500, "Internal Server Error"))
                .with(
                    "top:technology",
                    Reply::Articles(vec![
                        article("https://e.com/t1", "2024-01-01T00:00:00Z"),
                        article("https://e.com/t2", "2024-01-02T00:00:00Z"),
                    ]),
                ),
        );

        vm.load_all_news(&[Category::Business, Category::Technology])
            .await;

        let state = vm.state();
        assert_eq!(state.error, None);
        let urls: Vec<_> = state
            .articles
            .iter()
            .map(|a| a.url.as_deref().unwrap())
            .collect();
        assert_eq!(urls, vec!["https://e.com/t2", "https://e.com/t1"]);
        assert!(state
            .articles
            .iter()
            .all(|a| a.category.as_deref() == Some("technology")));
    }

    #[tokio::test]
    async fn test_all_news_merges_and_sorts() {
        let vm = view_model(
            ScriptedSource::new()
                .with(
                    "top:business",
                    Reply::Articles(vec![article("https://e.com/b", "2024-01-02T00:00:00Z")]),
                )
                .with(
                    "top:health",
                    Reply::Articles(vec![
                        article("https://e.com/h1", "2024-01-03T00:00:00Z"),
                        article("https://e.com/h2", "2024-01-01T00:00:00Z"),
                    ]),
                ),
        );

        vm.load_all_news(&[Category::Business, Category::Health]).await;

        let urls: Vec<_> = vm
            .state()
            .articles
            .iter()
            .map(|a| a.url.clone().unwrap())
            .collect();
        assert_eq!(urls, vec!["https://e.com/h1", "https://e.com/b", "https://e.com/h2"]);
    }

    #[tokio::test]
    async fn test_all_news_total_failure_concatenates_errors() {
        let vm = view_model(
            ScriptedSource::new()
                .with("top:business", Reply::Status(500, "Internal Server Error"))
                .with("top:technology", Reply::Status(429, "Too Many Requests")),
        );

        vm.load_all_news(&[Category::Business, Category::Technology])
            .await;

        let state = vm.state();
        assert!(state.articles.is_empty());
        assert_eq!(
            state.error.as_deref(),
            Some("Business: Error: 500 - Internal Server Error\nTechnology: Error: 429 - Too Many Requests")
        );
    }

    #[tokio::test]
    async fn test_all_news_with_no_categories() {
        let vm = view_model(ScriptedSource::new());
        vm.load_all_news(&[]).await;
        assert_eq!(vm.state().error.as_deref(), Some("No news available"));
    }

    #[tokio::test]
    async fn test_empty_search_shows_empty_state_not_error() {
        let vm = view_model(ScriptedSource::new().with("search:nothing", Reply::Articles(vec![])));

        vm.load_search("nothing").await;

        let state = vm.state();
        assert_eq!(state.error, None);
        assert_eq!(state.empty_message(), Some("No news found"));
    }

    #[test]
    fn test_nothing_fetched_yet_has_no_empty_message() {
        assert_eq!(NewsState::default().empty_message(), None);
    }

    #[tokio::test]
    async fn test_first_fetch_marks_state_loaded() {
        let vm = view_model(ScriptedSource::new().with("search:nothing", Reply::Articles(vec![])));
        assert!(!vm.state().loaded);

        vm.load_search("nothing").await;
        assert!(vm.state().loaded);
    }

    #[tokio::test]
    async fn test_slow_earlier_fetch_does_not_overwrite_later_one() {
        let (vm, source) = two_speed(Duration::from_millis(200), Duration::from_millis(10));
        let mut rx = vm.subscribe();

        vm.get_news_by_category(Category::Business);
        wait_for_calls(&source, 1).await;
        vm.get_news_by_category(Category::Technology);

        // The borrow returned by wait_for is released before any further await.
        assert!(timeout(Duration::from_secs(2), rx.wait_for(|s| !s.is_loading))
            .await
            .is_ok());
        assert_eq!(urls(&vm.state()), vec!["https://e.com/t"]);

        // Let the business reply arrive; it is discarded.
        tokio::time::sleep(Duration::from_millis(300)).await;
        let state = vm.state();
        assert!(!state.is_loading);
        assert_eq!(urls(&state), vec!["https://e.com/t"]);
        assert_eq!(state.articles[0].category.as_deref(), Some("technology"));
    }

    #[tokio::test]
    async fn test_loading_holds_until_latest_fetch_lands() {
        let (vm, source) = two_speed(Duration::from_millis(50), Duration::from_millis(400));

        vm.get_news_by_category(Category::Business);
        wait_for_calls(&source, 1).await;
        vm.get_news_by_category(Category::Technology);

        // Business has answered by now but technology is still in flight.
        tokio::time::sleep(Duration::from_millis(200)).await;
        let state = vm.state();
        assert!(state.is_loading);
        assert!(state.articles.is_empty());
        assert!(!state.loaded);

        let mut rx = vm.subscribe();
        assert!(timeout(Duration::from_secs(2), rx.wait_for(|s| !s.is_loading))
            .await
            .is_ok());
        assert_eq!(urls(&vm.state()), vec!["https://e.com/t"]);
    }

    #[tokio::test]
    async fn test_bulk_fetch_superseded_by_category_fetch() {
        let (vm, source) = two_speed(Duration::from_millis(200), Duration::from_millis(10));
        let mut rx = vm.subscribe();

        vm.get_all_news(vec![Category::Business]);
        wait_for_calls(&source, 1).await;
        vm.get_news_by_category(Category::Technology);

        assert!(timeout(Duration::from_secs(2), rx.wait_for(|s| !s.is_loading))
            .await
            .is_ok());
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(urls(&vm.state()), vec!["https://e.com/t"]);
    }

    #[test]
    fn test_empty_message_hidden_while_loading_or_failed() {
        let loading = NewsState {
            is_loading: true,
            loaded: true,
            ..Default::default()
        };
        assert_eq!(loading.empty_message(), None);

        let failed = NewsState {
            error: Some("boom".into()),
            loaded: true,
            ..Default::default()
        };
        assert_eq!(failed.empty_message(), None);
    }

    #[tokio::test]
    async fn test_spawned_fetch_publishes_state() {
        let vm = view_model(ScriptedSource::new().with(
            "top:science",
            Reply::Articles(vec![article("https://e.com/s", "2024-01-01T00:00:00Z")]),
        ));
        let mut rx = vm.subscribe();

        vm.get_news_by_category(Category::Science);

        let settled = timeout(
            Duration::from_secs(2),
            rx.wait_for(|s| !s.is_loading && !s.articles.is_empty()),
        )
        .await;
        assert!(settled.is_ok());
    }

    #[tokio::test]
    async fn test_favorite_writes_are_observable() {
        let vm = view_model(ScriptedSource::new());
        let a = article("https://e.com/a", "2024-01-01T00:00:00Z");
        let mut flag = vm.is_favorite("https://e.com/a");

        // Ignoring the receiver is allowed; awaiting it confirms the write.
        let done = vm.save_favorite(a.clone());
        assert_ok!(done.await.unwrap());
        assert!(timeout(Duration::from_secs(2), flag.wait_for(|v| *v))
            .await
            .is_ok());

        let done = vm.toggle_favorite(a, false);
        assert_ok!(done.await.unwrap());
        assert!(timeout(Duration::from_secs(2), flag.wait_for(|v| !*v))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_favorite_write_failure_is_reported() {
        let vm = view_model(ScriptedSource::new());
        let done = vm.save_favorite(Article::default());
        assert!(done.await.unwrap().is_err());
    }

    #[tokio::test]
    async fn test_favorite_write_leaves_article_list_alone() {
        let vm = view_model(ScriptedSource::new().with(
            "everything:us",
            Reply::Articles(vec![article("https://e.com/a", "2024-01-01T00:00:00Z")]),
        ));
        vm.load_everything("us").await;
        let before = vm.state();

        let article = before.articles[0].clone();
        vm.save_favorite(article).await.unwrap().unwrap();

        assert_eq!(vm.state(), before);
    }
}
