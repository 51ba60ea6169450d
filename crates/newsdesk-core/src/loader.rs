//! Page-by-page accumulation of the article listing.
//!
//! A [`ListLoader`] owns one [`ListLoadState`] and drives it through
//! `Idle → Loading → Succeeded | Failed`, re-entering `Loading` for every
//! further page. The phase check and the transition to `Loading` happen under
//! a single lock acquisition, so at most one page fetch per loader is ever in
//! flight and overlapping triggers are reported as [`LoadOutcome::Skipped`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::gateway::ArticleSource;
use crate::{ApiError, ArticleSummary};

/// Lifecycle phase shared by the list and detail state containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl LoadPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// Render-ready view of the accumulated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListLoadState {
    /// Items in page order. Only ever replaced by page 1 or appended to.
    pub items: Vec<ArticleSummary>,
    pub phase: LoadPhase,
    /// Message of the last failed load, cleared when the next load starts.
    pub error: Option<String>,
    /// False once a fetched page came back empty.
    pub has_more: bool,
    pub current_page: u32,
}

impl Default for ListLoadState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            phase: LoadPhase::Idle,
            error: None,
            has_more: true,
            current_page: 1,
        }
    }
}

/// What a call to [`ListLoader::activate`] or [`ListLoader::load_more`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The guard refused the call; no fetch was made.
    Skipped,
    /// The page arrived and was merged into the state.
    Loaded { page: u32, received: usize },
    /// The fetch failed; the state now carries the message.
    Failed(ApiError),
    /// The loader was reset while the fetch was in flight; its result was dropped.
    Discarded { page: u32 },
}

impl LoadOutcome {
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

#[derive(Debug, Default)]
struct LoaderInner {
    state: ListLoadState,
    generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct Ticket {
    page: u32,
    generation: u64,
}

impl LoaderInner {
    fn begin(&mut self, page: u32) -> Ticket {
        self.state.phase = LoadPhase::Loading;
        self.state.error = None;
        Ticket {
            page,
            generation: self.generation,
        }
    }
}

/// Incremental loader over any [`ArticleSource`].
pub struct ListLoader {
    source: Arc<dyn ArticleSource>,
    inner: Mutex<LoaderInner>,
}

impl ListLoader {
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        Self {
            source,
            inner: Mutex::new(LoaderInner::default()),
        }
    }

    /// Initial load: fetches page 1 only when nothing has been loaded yet.
    pub async fn activate(&self) -> LoadOutcome {
        let ticket = {
            let mut inner = self.lock();
            if !inner.state.items.is_empty() || inner.state.phase != LoadPhase::Idle {
                return LoadOutcome::Skipped;
            }
            inner.begin(1)
        };

        self.run(ticket).await
    }

    /// Fetch the page after the accumulated items.
    ///
    /// A no-op while a load is in flight or once the listing is exhausted.
    pub async fn load_more(&self) -> LoadOutcome {
        let ticket = {
            let mut inner = self.lock();
            if inner.state.phase == LoadPhase::Loading || !inner.state.has_more {
                tracing::debug!(
                    phase = inner.state.phase.as_str(),
                    has_more = inner.state.has_more,
                    "load_more skipped"
                );
                return LoadOutcome::Skipped;
            }
            let page = next_page(inner.state.items.len(), DEFAULT_PAGE_SIZE);
            inner.begin(page)
        };

        self.run(ticket).await
    }

    /// Back to the initial state. A fetch still in flight is discarded when it lands.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = ListLoadState::default();
    }

    /// User-initiated retry: reset, then load page 1 again.
    pub async fn reload(&self) -> LoadOutcome {
        self.reset();
        self.activate().await
    }

    pub fn snapshot(&self) -> ListLoadState {
        self.lock().state.clone()
    }

    pub fn phase(&self) -> LoadPhase {
        self.lock().state.phase
    }

    pub fn has_more(&self) -> bool {
        self.lock().state.has_more
    }

    async fn run(&self, ticket: Ticket) -> LoadOutcome {
        tracing::debug!(page = ticket.page, "loading page");
        let result = self.source.fetch_list_page(ticket.page).await;

        let mut inner = self.lock();
        if inner.generation != ticket.generation {
            tracing::debug!(page = ticket.page, "discarding page for a reset loader");
            return LoadOutcome::Discarded { page: ticket.page };
        }

        match result {
            Ok(page) => {
                let received = page.results.len();
                let state = &mut inner.state;
                if ticket.page == 1 {
                    state.items = page.results;
                } else {
                    state.items.extend(page.results);
                }
                state.current_page = ticket.page;
                state.has_more = received > 0;
                state.phase = LoadPhase::Succeeded;
                tracing::info!(
                    page = ticket.page,
                    received,
                    total_items = state.items.len(),
                    has_more = state.has_more,
                    "page loaded"
                );
                LoadOutcome::Loaded {
                    page: ticket.page,
                    received,
                }
            }
            Err(error) => {
                inner.state.phase = LoadPhase::Failed;
                inner.state.error = Some(error.to_string());
                tracing::warn!(
                    page = ticket.page,
                    code = error.code(),
                    error = %error,
                    "page load failed"
                );
                LoadOutcome::Failed(error)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoaderInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn next_page(loaded: usize, page_size: usize) -> u32 {
    let page = loaded.div_ceil(page_size) + 1;
    u32::try_from(page).unwrap_or(u32::MAX)
}
