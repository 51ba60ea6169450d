//! Fixtures shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use crate::gateway::ArticleSource;
use crate::{ApiError, ArticleDetail, ArticleId, ArticlePage, ArticleSummary, UtcDateTime};

pub(crate) fn summary(id: &str) -> ArticleSummary {
    ArticleSummary {
        id: ArticleId::parse(id).expect("fixture id should be valid"),
        title: format!("Title of {id}"),
        url: format!("https://www.theguardian.com/{id}"),
        published_at: UtcDateTime::parse("2024-01-15T10:30:00Z").expect("fixture timestamp"),
        section_name: String::from("Technology"),
        thumbnail: None,
        trail_text: Some(String::from("Trail")),
    }
}

pub(crate) fn detail(id: &str) -> ArticleDetail {
    let summary = summary(id);
    ArticleDetail {
        id: summary.id,
        title: summary.title,
        url: summary.url,
        published_at: summary.published_at,
        section_name: summary.section_name,
        thumbnail: summary.thumbnail,
        trail_text: summary.trail_text,
        body: Some(String::from("<p>Body</p>")),
    }
}

/// A page of `count` items whose ids are prefixed with `technology/p{page}/`.
pub(crate) fn page(page: u32, count: usize) -> ArticlePage {
    ArticlePage {
        status: String::from("ok"),
        total: 100,
        pages: 10,
        current_page: page,
        results: (0..count)
            .map(|index| summary(&format!("technology/p{page}/item-{index}")))
            .collect(),
    }
}

/// Source that replays queued list pages and details, recording requests.
#[derive(Default)]
pub(crate) struct StubSource {
    pages: Mutex<VecDeque<Result<ArticlePage, ApiError>>>,
    details: Mutex<VecDeque<Result<ArticleDetail, ApiError>>>,
    requested_pages: Mutex<Vec<u32>>,
}

impl StubSource {
    pub(crate) fn with_pages(
        pages: impl IntoIterator<Item = Result<ArticlePage, ApiError>>,
    ) -> Self {
        let source = Self::default();
        source
            .pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(pages);
        source
    }

    pub(crate) fn push_detail(&self, outcome: Result<ArticleDetail, ApiError>) {
        self.details
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }

    pub(crate) fn requested_pages(&self) -> Vec<u32> {
        self.requested_pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ArticleSource for StubSource {
    fn fetch_list_page<'a>(
        &'a self,
        page: u32,
    ) -> Pin<Box<dyn Future<Output = Result<ArticlePage, ApiError>> + Send + 'a>> {
        self.requested_pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(page);
        let outcome = self
            .pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::api("no page scripted")));
        Box::pin(async move { outcome })
    }

    fn fetch_by_id<'a>(
        &'a self,
        _id: &'a ArticleId,
    ) -> Pin<Box<dyn Future<Output = Result<ArticleDetail, ApiError>> + Send + 'a>> {
        let outcome = self
            .details
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::not_found("Article")));
        Box::pin(async move { outcome })
    }
}
