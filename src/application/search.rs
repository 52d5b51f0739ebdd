//! Trailing-edge debounced search with request sequencing.
//!
//! Every input change bumps a generation counter and aborts the task spawned
//! for the previous change. A task waits out the quiet period, issues one
//! lookup and tags the outcome with its generation; [`SearchOutcomes`] only
//! yields outcomes whose generation is still the latest, so a slow
//! superseded response can never replace newer results.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use school_blog_api_types::{Category, Post};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::application::api::BlogApi;
use crate::application::error::{Operation, OperationError, OperationResultExt};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub category: Option<Category>,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, category: Option<Category>) -> Self {
        Self {
            term: term.into(),
            category,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.term.trim().is_empty()
    }
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub generation: u64,
    pub query: SearchQuery,
    pub result: Result<Vec<Post>, OperationError>,
}

pub struct SearchDebouncer {
    api: Arc<dyn BlogApi>,
    delay: Duration,
    latest: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<SearchOutcome>,
}

/// Receiving half: yields only outcomes of the most recent input.
pub struct SearchOutcomes {
    rx: mpsc::UnboundedReceiver<SearchOutcome>,
    latest: Arc<AtomicU64>,
}

impl SearchDebouncer {
    pub fn new(api: Arc<dyn BlogApi>, delay: Duration) -> (Self, SearchOutcomes) {
        let (tx, rx) = mpsc::unbounded_channel();
        let latest = Arc::new(AtomicU64::new(0));
        let debouncer = Self {
            api,
            delay,
            latest: latest.clone(),
            pending: None,
            tx,
        };
        (debouncer, SearchOutcomes { rx, latest })
    }

    /// Register an input change. Must be called from within a tokio runtime.
    ///
    /// Returns the generation of the scheduled lookup, or `None` when the
    /// term is blank and nothing was scheduled.
    pub fn update(&mut self, query: SearchQuery) -> Option<u64> {
        self.cancel_pending();
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if query.is_blank() {
            debug!(generation, "blank search term; nothing scheduled");
            return None;
        }

        let query = SearchQuery {
            term: query.term.trim().to_string(),
            category: query.category,
        };
        let api = self.api.clone();
        let latest = self.latest.clone();
        let tx = self.tx.clone();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }

            debug!(generation, term = %query.term, category = ?query.category, "dispatching search");
            let result = api
                .search_posts(&query.term, query.category)
                .await
                .for_operation(Operation::Search);
            if let Err(err) = &result {
                warn!(generation, error = %err.source, "search failed");
            }

            let outcome = SearchOutcome {
                generation,
                query,
                result,
            };
            if tx.send(outcome).is_err() {
                debug!(generation, "search outcome receiver dropped");
            }
        }));

        Some(generation)
    }

    /// Drop any scheduled or in-flight lookup without issuing a new one.
    pub fn cancel(&mut self) {
        self.cancel_pending();
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl SearchOutcomes {
    /// Next current outcome. Returns `None` once the debouncer and every
    /// task it spawned are gone.
    pub async fn next(&mut self) -> Option<SearchOutcome> {
        loop {
            let outcome = self.rx.recv().await?;
            let latest = self.latest.load(Ordering::SeqCst);
            if outcome.generation == latest {
                return Some(outcome);
            }
            debug!(
                generation = outcome.generation,
                latest, "dropping stale search outcome"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::{Instant, sleep, timeout};

    use super::*;
    use crate::application::testing::{StubApi, post};

    fn catalogue() -> Vec<Post> {
        let mut posts = vec![
            post("art", Category::Culture),
            post("art history", Category::Culture),
            post("music", Category::Culture),
        ];
        for p in &mut posts {
            p.title = p.id.clone();
        }
        posts
    }

    fn debouncer(api: &Arc<StubApi>) -> (SearchDebouncer, SearchOutcomes) {
        SearchDebouncer::new(api.clone(), DEFAULT_DEBOUNCE)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_keystrokes_fires_once_with_final_value() {
        let api = Arc::new(StubApi::with_posts(catalogue()));
        let (mut search, mut outcomes) = debouncer(&api);

        for term in ["a", "ar", "art", "art ", "art h"] {
            search.update(SearchQuery::new(term, None));
            sleep(Duration::from_millis(120)).await;
        }
        search.update(SearchQuery::new("art history", None));

        let outcome = outcomes.next().await.expect("one outcome");
        assert_eq!(outcome.query.term, "art history");
        assert_eq!(api.calls(), ["search:art history:-"]);
    }

    #[tokio::test(start_paused = true)]
    async fn art_then_art_history_within_100ms() {
        let api = Arc::new(StubApi::with_posts(catalogue()));
        let (mut search, mut outcomes) = debouncer(&api);
        let start = Instant::now();

        search.update(SearchQuery::new("art", None));
        sleep(Duration::from_millis(100)).await;
        search.update(SearchQuery::new("art history", None));

        let outcome = outcomes.next().await.expect("outcome");
        assert!(start.elapsed() >= Duration::from_millis(400));
        assert_eq!(outcome.query.term, "art history");
        let titles: Vec<String> = outcome
            .result
            .expect("results")
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["art history"]);
        assert_eq!(api.calls(), ["search:art history:-"]);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_query_never_requests() {
        let api = Arc::new(StubApi::with_posts(catalogue()));
        let (mut search, mut outcomes) = debouncer(&api);

        assert_eq!(search.update(SearchQuery::new("", None)), None);
        assert_eq!(search.update(SearchQuery::new("   ", None)), None);
        search.update(SearchQuery::new("art", None));
        sleep(Duration::from_millis(50)).await;
        search.update(SearchQuery::new("", None));

        let waited = timeout(Duration::from_secs(2), outcomes.next()).await;
        assert!(waited.is_err(), "no outcome expected");
        assert!(api.calls().is_empty());
        assert!(!search.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn category_change_restarts_the_quiet_period() {
        let api = Arc::new(StubApi::with_posts(catalogue()));
        let (mut search, mut outcomes) = debouncer(&api);

        search.update(SearchQuery::new("art", None));
        sleep(Duration::from_millis(200)).await;
        search.update(SearchQuery::new("art", Some(Category::Culture)));

        let outcome = outcomes.next().await.expect("outcome");
        assert_eq!(outcome.query.category, Some(Category::Culture));
        assert_eq!(api.calls(), ["search:art:Culture"]);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_outcome_is_never_delivered() {
        let api = Arc::new(StubApi::with_posts(catalogue()));
        let (mut search, mut outcomes) = debouncer(&api);

        search.update(SearchQuery::new("art", None));
        sleep(Duration::from_millis(500)).await;
        assert!(!search.is_pending());

        search.update(SearchQuery::new("music", None));
        let outcome = outcomes.next().await.expect("outcome");
        assert_eq!(outcome.query.term, "music");
        assert_eq!(api.calls(), ["search:art:-", "search:music:-"]);
    }

    #[tokio::test(start_paused = true)]
    async fn superseding_aborts_in_flight_request() {
        let api = Arc::new(StubApi::with_posts(catalogue()).search_latency(Duration::from_secs(5)));
        let (mut search, mut outcomes) = debouncer(&api);

        search.update(SearchQuery::new("art", None));
        sleep(Duration::from_millis(400)).await;
        assert!(search.is_pending());

        search.update(SearchQuery::new("music", None));
        let outcome = outcomes.next().await.expect("outcome");
        assert_eq!(outcome.query.term, "music");
        assert_eq!(outcome.generation, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_reports_message_without_retry() {
        let api = Arc::new(StubApi::rejecting(500));
        let (mut search, mut outcomes) = debouncer(&api);

        search.update(SearchQuery::new("art", None));
        let outcome = outcomes.next().await.expect("outcome");
        let err = outcome.result.expect_err("failure");
        assert_eq!(err.message, "Search failed. Please try again later.");
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_debouncer_still_delivers_the_pending_outcome() {
        let api = Arc::new(StubApi::with_posts(catalogue()));
        let (mut search, mut outcomes) = debouncer(&api);

        search.update(SearchQuery::new("music", None));
        drop(search);

        let outcome = outcomes.next().await.expect("pending outcome");
        assert_eq!(outcome.query.term, "music");
        assert!(outcomes.next().await.is_none());
    }
}
