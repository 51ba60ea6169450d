//! # Domain Models
//!
//! Canonical article types produced from content API responses.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ArticleId`] | Validated content path of one article |
//! | [`ArticleSummary`] | List item (title, link, date, section, thumbnail, trail text) |
//! | [`ArticleDetail`] | Full article, optionally with body markup |
//! | [`ArticlePage`] | One page of search results with paging totals |
//! | [`UtcDateTime`] | UTC publication timestamp |
//!
//! Wire shapes stay private to the gateway; everything here is validated at
//! construction and serializes with snake_case field names.

mod article;
mod article_id;
mod timestamp;

pub use article::{ArticleDetail, ArticlePage, ArticleSummary};
pub use article_id::ArticleId;
pub use timestamp::UtcDateTime;
