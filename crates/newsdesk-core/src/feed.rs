//! Infinite scrolling over a [`ListLoader`].
//!
//! The feed keeps a [`SentinelObserver`] on the last loaded item. Every
//! scroll re-syncs that observation with the loader state, and the first
//! time the sentinel comes into view the next page is requested.

use crate::loader::{ListLoadState, ListLoader, LoadOutcome, LoadPhase};
use crate::viewport::{ObserverOptions, SentinelObserver, Viewport};
use crate::ArticleId;

pub struct InfiniteFeed {
    loader: ListLoader,
    options: ObserverOptions,
    observer: SentinelObserver<ArticleId>,
}

impl InfiniteFeed {
    pub fn new(loader: ListLoader, options: ObserverOptions) -> Self {
        Self {
            loader,
            options,
            observer: SentinelObserver::new(options),
        }
    }

    pub fn loader(&self) -> &ListLoader {
        &self.loader
    }

    /// Mount: load the first page if nothing is loaded yet.
    pub async fn start(&mut self) -> LoadOutcome {
        let outcome = self.loader.activate().await;
        self.sync();
        outcome
    }

    /// Report the current viewport. Loads the next page when the sentinel
    /// enters view for the first time.
    pub async fn scroll(&mut self, viewport: Viewport) -> LoadOutcome {
        self.sync();
        if !self.observer.check(viewport) {
            return LoadOutcome::Skipped;
        }

        tracing::debug!(
            offset = viewport.offset,
            height = viewport.height,
            "sentinel entered viewport"
        );
        let outcome = self.loader.load_more().await;
        self.sync();
        outcome
    }

    /// Remount after a failure: drop the observation and start from page 1.
    pub async fn reload(&mut self) -> LoadOutcome {
        self.release();
        let outcome = self.loader.reload().await;
        self.sync();
        outcome
    }

    /// Unmount: stop observing.
    pub fn release(&mut self) {
        self.observer.disconnect();
    }

    pub fn state(&self) -> ListLoadState {
        self.loader.snapshot()
    }

    pub fn is_observing(&self) -> bool {
        self.observer.is_observing()
    }

    fn sync(&mut self) {
        let state = self.loader.snapshot();
        let sentinel = state.items.last().map(|item| {
            let row = u32::try_from(state.items.len() - 1).unwrap_or(u32::MAX);
            (item.id.clone(), row)
        });

        self.observer.observe(sentinel);
        self.observer.set_enabled(
            self.options.enabled && state.phase == LoadPhase::Succeeded && state.has_more,
        );
    }
}
