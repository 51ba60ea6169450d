use serde::{Deserialize, Serialize};

use crate::{ArticleId, UtcDateTime};

/// List item as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: ArticleId,
    pub title: String,
    pub url: String,
    pub published_at: UtcDateTime,
    pub section_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trail_text: Option<String>,
}

/// Full article as returned by the by-id endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDetail {
    pub id: ArticleId,
    pub title: String,
    pub url: String,
    pub published_at: UtcDateTime,
    pub section_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trail_text: Option<String>,
    /// Body markup, absent when the API withholds it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ArticleDetail {
    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            url: self.url.clone(),
            published_at: self.published_at,
            section_name: self.section_name.clone(),
            thumbnail: self.thumbnail.clone(),
            trail_text: self.trail_text.clone(),
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePage {
    pub status: String,
    pub total: u64,
    pub pages: u32,
    pub current_page: u32,
    pub results: Vec<ArticleSummary>,
}

impl ArticlePage {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
