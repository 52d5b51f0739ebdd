//! Home feed: category filter, load state and revealed window.

use std::sync::Arc;

use school_blog_api_types::{Category, Post};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::api::BlogApi;
use crate::application::error::{Operation, OperationError, OperationResultExt};
use crate::application::reveal::ListRevealer;
use crate::application::search::SearchOutcome;
use crate::domain::posts::filter_by_category;

pub const EMPTY_FEED_MESSAGE: &str = "No posts available.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    HasResults,
    Empty,
}

/// Identifies one load; only the most recently issued ticket may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone)]
pub struct FeedPage {
    category: Option<Category>,
    posts: Vec<Post>,
    phase: Phase,
    revealer: ListRevealer,
    generation: u64,
    settled: Phase,
}

impl Default for FeedPage {
    fn default() -> Self {
        Self::new(ListRevealer::default())
    }
}

impl FeedPage {
    pub fn new(revealer: ListRevealer) -> Self {
        Self {
            category: None,
            posts: Vec::new(),
            phase: Phase::Idle,
            revealer,
            generation: 0,
            settled: Phase::Idle,
        }
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Everything the last successful load returned, unfiltered.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Change the active filter. Returns `true` when it actually changed, in
    /// which case the caller should reload.
    pub fn select_category(&mut self, category: Option<Category>) -> bool {
        if self.category == category {
            return false;
        }
        self.category = category;
        true
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.phase = Phase::Loading;
        LoadTicket(self.generation)
    }

    /// Mark a scheduled search as in flight, superseding any pending load.
    /// Returns `true` when the page was not already loading.
    pub fn begin_search(&mut self) -> bool {
        self.generation += 1;
        let entered = self.phase != Phase::Loading;
        self.phase = Phase::Loading;
        entered
    }

    /// Drop whatever load or search is pending and fall back to the last
    /// settled phase. Returns `false` when nothing was pending.
    pub fn abandon_pending(&mut self) -> bool {
        if self.phase != Phase::Loading {
            return false;
        }
        self.generation += 1;
        self.phase = self.settled.clone();
        true
    }

    /// Apply a finished load. Returns `false` when a newer load or search
    /// superseded it, leaving the page untouched.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Post>, OperationError>,
    ) -> bool {
        if ticket.0 != self.generation {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                "ignoring superseded feed load"
            );
            return false;
        }
        self.apply(result);
        true
    }

    /// Replace the list with a search outcome, superseding any pending load.
    pub fn apply_search(&mut self, outcome: SearchOutcome) {
        self.generation += 1;
        self.apply(outcome.result);
    }

    fn apply(&mut self, result: Result<Vec<Post>, OperationError>) {
        match result {
            Ok(posts) => {
                self.posts = posts;
                self.phase = Phase::Loaded;
            }
            Err(err) => {
                self.phase = Phase::Failed {
                    message: err.message,
                };
            }
        }
        self.settled = self.phase.clone();
    }

    /// Posts under the active filter, in source order.
    pub fn filtered(&self) -> Vec<&Post> {
        filter_by_category(&self.posts, self.category)
    }

    pub fn listing(&self) -> Option<Listing> {
        match self.phase {
            Phase::Loaded if self.filtered().is_empty() => Some(Listing::Empty),
            Phase::Loaded => Some(Listing::HasResults),
            _ => None,
        }
    }

    pub fn reveal_more(&mut self) -> usize {
        let total = self.filtered().len();
        self.revealer.reveal_more(total)
    }

    pub fn view(&self) -> FeedView<'_> {
        match &self.phase {
            Phase::Idle => FeedView::Idle,
            Phase::Loading => FeedView::Loading,
            Phase::Failed { message } => FeedView::Failed {
                message: message.as_str(),
            },
            Phase::Loaded => {
                let filtered = self.filtered();
                let total = filtered.len();
                let window = self.revealer.window(&filtered);
                match window.split_first() {
                    None => FeedView::Empty {
                        category: self.category,
                        message: EMPTY_FEED_MESSAGE,
                    },
                    Some((&featured, tiles)) => FeedView::Results {
                        category: self.category,
                        total,
                        visible: window.len(),
                        can_reveal_more: self.revealer.can_reveal_more(total),
                        featured,
                        tiles: tiles.to_vec(),
                    },
                }
            }
        }
    }
}

/// What the feed page would render right now.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedView<'a> {
    Idle,
    Loading,
    Failed {
        message: &'a str,
    },
    Empty {
        category: Option<Category>,
        message: &'static str,
    },
    Results {
        category: Option<Category>,
        total: usize,
        visible: usize,
        can_reveal_more: bool,
        featured: &'a Post,
        tiles: Vec<&'a Post>,
    },
}

#[derive(Clone)]
pub struct FeedService {
    api: Arc<dyn BlogApi>,
}

impl FeedService {
    pub fn new(api: Arc<dyn BlogApi>) -> Self {
        Self { api }
    }

    /// Fetch the list for the page's current category.
    pub async fn refresh(&self, page: &mut FeedPage) -> bool {
        let ticket = page.begin_load();
        self.load(page, ticket).await
    }

    /// Finish a load the caller already began, so the loading state can be
    /// shown in between.
    pub async fn load(&self, page: &mut FeedPage, ticket: LoadTicket) -> bool {
        let category = page.category();
        let result = self
            .api
            .list_posts(category)
            .await
            .for_operation(Operation::ListPosts);
        match &result {
            Ok(posts) => info!(count = posts.len(), ?category, "feed loaded"),
            Err(err) => warn!(error = %err.source, ?category, "feed load failed"),
        }
        page.complete_load(ticket, result)
    }
}
