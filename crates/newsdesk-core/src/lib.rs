//! # Newsdesk Core
//!
//! Access layer and view state for the Guardian content API technology feed.
//!
//! ## Overview
//!
//! - **Response cache** with a fixed TTL and lazy eviction
//! - **Error classifier** mapping raw failures onto a closed error type
//! - **Retry loop** for connection-level failures with a fixed delay
//! - **Article gateway** for list pages and single articles
//! - **Incremental list loader** and detail state for a view layer
//! - **Sentinel observer** that drives infinite scrolling
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | TTL cache and deterministic key generation |
//! | [`config`] | API configuration and fixed tuning constants |
//! | [`detail`] | Single-article view state |
//! | [`domain`] | Domain models (ArticleSummary, ArticleDetail, ArticlePage) |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Error types |
//! | [`failure`] | Raw fetch failures and classification |
//! | [`feed`] | Infinite scrolling over a list loader |
//! | [`gateway`] | Article source trait and content API gateway |
//! | [`http_client`] | HTTP client abstraction |
//! | [`loader`] | Page-by-page list accumulation |
//! | [`query`] | Sorted query parameters |
//! | [`retry`] | Fixed-delay retry loop |
//! | [`viewport`] | Sentinel visibility tracking |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use newsdesk_core::{ApiConfig, CacheStore, GuardianGateway, ListLoader, ReqwestHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = GuardianGateway::new(
//!         Arc::new(ReqwestHttpClient::new()?),
//!         CacheStore::with_default_ttl(),
//!         ApiConfig::from_env(),
//!     );
//!
//!     let loader = ListLoader::new(Arc::new(gateway));
//!     loader.activate().await;
//!     loader.load_more().await;
//!
//!     for item in loader.snapshot().items {
//!         println!("{} {}", item.published_at.date_label(), item.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │  InfiniteFeed   │────▶│ SentinelObserver │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  ListLoader /   │
//! │  DetailLoader   │
//! └────────┬────────┘
//!          │ ArticleSource
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ GuardianGateway │────▶│ CacheStore       │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ with_retry      │────▶│ HTTP Client      │
//! │ + classify      │     │ (reqwest/script) │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Every gateway call resolves to [`ApiError`], matched exhaustively:
//!
//! ```rust
//! use newsdesk_core::ApiError;
//!
//! fn describe(error: &ApiError) -> &'static str {
//!     match error {
//!         ApiError::Network { .. } => "offline, try again",
//!         ApiError::NotFound { .. } => "gone",
//!         ApiError::Api { .. } => "the API refused the request",
//!         ApiError::Configuration { .. } => "set the API key",
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! The API key is resolved from the environment on every call and never logged.

pub mod cache;
pub mod config;
pub mod detail;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod failure;
pub mod feed;
pub mod gateway;
pub mod http_client;
pub mod loader;
pub mod query;
pub mod retry;
pub mod viewport;

#[cfg(test)]
mod test_support;

// Caching
pub use cache::{generate_key, CacheMode, CacheStore};

// Configuration
pub use config::{ApiConfig, ApiKeySource};

// View state
pub use detail::{DetailLoader, DetailOutcome, DetailState};
pub use feed::InfiniteFeed;
pub use loader::{ListLoadState, ListLoader, LoadOutcome, LoadPhase};
pub use viewport::{ObserverOptions, SentinelObserver, Viewport};

// Domain models
pub use domain::{ArticleDetail, ArticleId, ArticlePage, ArticleSummary, UtcDateTime};

// Envelope and errors
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{ApiError, ValidationError};

// Fetching
pub use failure::{classify, FetchFailure};
pub use gateway::{ArticleSource, GuardianGateway};
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
    ScriptedHttpClient, TransportErrorKind,
};
pub use query::QueryParams;
pub use retry::{with_retry, RetryConfig};
