//! State for the single-article view.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::gateway::ArticleSource;
use crate::loader::LoadPhase;
use crate::{ApiError, ArticleDetail, ArticleId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailState {
    /// Last article shown. Kept while a new one loads.
    pub article: Option<ArticleDetail>,
    pub phase: LoadPhase,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    Loaded,
    Failed(ApiError),
    /// Superseded by a newer `load`, `clear` or `set_current` before the
    /// fetch finished.
    Discarded,
}

#[derive(Debug, Default)]
struct DetailInner {
    state: DetailState,
    generation: u64,
}

pub struct DetailLoader {
    source: Arc<dyn ArticleSource>,
    inner: Mutex<DetailInner>,
}

impl DetailLoader {
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        Self {
            source,
            inner: Mutex::new(DetailInner::default()),
        }
    }

    /// Fetch `id` and make it the current article.
    pub async fn load(&self, id: &ArticleId) -> DetailOutcome {
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state.phase = LoadPhase::Loading;
            inner.state.error = None;
            inner.generation
        };

        let result = self.source.fetch_by_id(id).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(id = id.as_str(), "discarding superseded article");
            return DetailOutcome::Discarded;
        }

        match result {
            Ok(article) => {
                inner.state.article = Some(article);
                inner.state.phase = LoadPhase::Succeeded;
                DetailOutcome::Loaded
            }
            Err(error) => {
                inner.state.phase = LoadPhase::Failed;
                inner.state.error = Some(error.to_string());
                tracing::warn!(
                    id = id.as_str(),
                    code = error.code(),
                    error = %error,
                    "article load failed"
                );
                DetailOutcome::Failed(error)
            }
        }
    }

    /// Show an article that is already at hand without fetching it.
    pub fn set_current(&self, article: ArticleDetail) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = DetailState {
            article: Some(article),
            phase: LoadPhase::Succeeded,
            error: None,
        };
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = DetailState::default();
    }

    pub fn snapshot(&self) -> DetailState {
        self.lock().state.clone()
    }

    fn lock(&self) -> MutexGuard<'_, DetailInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use tokio::sync::Notify;

    use super::*;
    use crate::test_support::{detail, StubSource};
    use crate::ArticlePage;

    fn id(value: &str) -> ArticleId {
        ArticleId::parse(value).expect("valid id")
    }

    #[tokio::test]
    async fn load_sets_current_article() {
        let source = Arc::new(StubSource::default());
        source.push_detail(Ok(detail("technology/2024/jan/15/a")));
        let loader = DetailLoader::new(source);

        let outcome = loader.load(&id("technology/2024/jan/15/a")).await;
        let state = loader.snapshot();

        assert_eq!(outcome, DetailOutcome::Loaded);
        assert_eq!(state.phase, LoadPhase::Succeeded);
        assert_eq!(
            state.article.map(|article| article.id),
            Some(id("technology/2024/jan/15/a"))
        );
    }

    #[tokio::test]
    async fn not_found_is_recorded_as_message() {
        let source = Arc::new(StubSource::default());
        source.push_detail(Err(ApiError::not_found("Article")));
        let loader = DetailLoader::new(source);

        let outcome = loader.load(&id("technology/missing")).await;
        let state = loader.snapshot();

        assert_eq!(outcome, DetailOutcome::Failed(ApiError::not_found("Article")));
        assert_eq!(state.phase, LoadPhase::Failed);
        assert_eq!(state.error.as_deref(), Some("Article not found"));
        assert!(state.article.is_none());
    }

    #[test]
    fn set_current_and_clear() {
        let loader = DetailLoader::new(Arc::new(StubSource::default()));

        loader.set_current(detail("technology/2024/jan/15/a"));
        assert_eq!(loader.snapshot().phase, LoadPhase::Succeeded);

        loader.clear();
        assert_eq!(loader.snapshot(), DetailState::default());
    }

    struct GatedDetails {
        gate: Notify,
        /// Gate for ids ending in `/b`.
        second: Notify,
    }

    impl ArticleSource for GatedDetails {
        fn fetch_list_page<'a>(
            &'a self,
            _page: u32,
        ) -> Pin<Box<dyn Future<Output = Result<ArticlePage, ApiError>> + Send + 'a>> {
            Box::pin(async { Err(ApiError::api("unused")) })
        }

        fn fetch_by_id<'a>(
            &'a self,
            id: &'a ArticleId,
        ) -> Pin<Box<dyn Future<Output = Result<ArticleDetail, ApiError>> + Send + 'a>> {
            Box::pin(async move {
                if id.as_str().ends_with("/b") {
                    self.second.notified().await;
                } else {
                    self.gate.notified().await;
                }
                Ok(detail(id.as_str()))
            })
        }
    }

    #[tokio::test]
    async fn clear_during_load_discards_result() {
        let source = Arc::new(GatedDetails {
            gate: Notify::new(),
            second: Notify::new(),
        });
        let loader = DetailLoader::new(source.clone());
        let article_id = id("technology/2024/jan/15/a");

        let (outcome, ()) = tokio::join!(loader.load(&article_id), async {
            loader.clear();
            source.gate.notify_one();
        });

        assert_eq!(outcome, DetailOutcome::Discarded);
        assert_eq!(loader.snapshot(), DetailState::default());
    }

    #[tokio::test]
    async fn older_load_finishing_last_does_not_replace_newer_article() {
        let source = Arc::new(GatedDetails {
            gate: Notify::new(),
            second: Notify::new(),
        });
        let loader = DetailLoader::new(source.clone());
        let first = id("technology/x/a");
        let second = id("technology/x/b");

        let (older, newer, ()) = tokio::join!(loader.load(&first), loader.load(&second), async {
            source.second.notify_one();
            tokio::task::yield_now().await;
            source.gate.notify_one();
        });

        assert_eq!(older, DetailOutcome::Discarded);
        assert_eq!(newer, DetailOutcome::Loaded);
        assert_eq!(
            loader.snapshot().article.map(|article| article.id),
            Some(second)
        );
    }
}
