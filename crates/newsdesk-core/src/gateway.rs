//! Article data gateway.
//!
//! [`GuardianGateway`] composes the response cache, the retry loop and the
//! error classifier into the two reads the rest of the crate needs: one page
//! of the technology listing, and one article by id.
//!
//! ```text
//! fetch_list_page / fetch_by_id
//!        │
//!        ├─ resolve API key ──────────────▶ ApiError::Configuration
//!        ├─ cache hit? ───────────────────▶ decoded payload
//!        ▼
//!   with_retry(GET) ── terminal failure ──▶ classify ─▶ ApiError
//!        │
//!        ▼
//!   decode + convert ─▶ cache.put ─▶ domain value
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::cache::{generate_key, CacheMode, CacheStore};
use crate::config::ApiConfig;
use crate::failure::{classify, FetchFailure};
use crate::http_client::{HttpClient, HttpRequest};
use crate::query::QueryParams;
use crate::retry::{with_retry, RetryConfig};
use crate::{
    ApiError, ArticleDetail, ArticleId, ArticlePage, ArticleSummary, UtcDateTime,
    ValidationError,
};

const SEARCH_PATH: &str = "/search";
const ARTICLE_RESOURCE: &str = "Article";
const LIST_FAILURE_MESSAGE: &str = "Failed to fetch tech news";
const DETAIL_FAILURE_MESSAGE: &str = "Failed to fetch article";

/// Read access to articles, as consumed by the loaders.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; loaders hold them behind an `Arc`.
pub trait ArticleSource: Send + Sync {
    /// Fetch one page (1-based) of the article listing.
    fn fetch_list_page<'a>(
        &'a self,
        page: u32,
    ) -> Pin<Box<dyn Future<Output = Result<ArticlePage, ApiError>> + Send + 'a>>;

    /// Fetch a single article with its body.
    fn fetch_by_id<'a>(
        &'a self,
        id: &'a ArticleId,
    ) -> Pin<Box<dyn Future<Output = Result<ArticleDetail, ApiError>> + Send + 'a>>;
}

/// Content API gateway with caching and connection-level retry.
#[derive(Clone)]
pub struct GuardianGateway {
    http_client: Arc<dyn HttpClient>,
    cache: CacheStore,
    config: ApiConfig,
    retry: RetryConfig,
    cache_mode: CacheMode,
}

impl GuardianGateway {
    pub fn new(http_client: Arc<dyn HttpClient>, cache: CacheStore, config: ApiConfig) -> Self {
        Self {
            http_client,
            cache,
            config,
            retry: RetryConfig::default(),
            cache_mode: CacheMode::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache_mode(mut self, cache_mode: CacheMode) -> Self {
        self.cache_mode = cache_mode;
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    async fn fetch_search_page(&self, page: u32) -> Result<ArticlePage, ApiError> {
        if page == 0 {
            return Err(ApiError::api("page numbers start at 1"));
        }

        let params = QueryParams::new()
            .with("section", &self.config.section)
            .with("page", page)
            .with("api-key", self.config.api_key.resolve()?)
            .with("show-fields", &self.config.list_fields);

        self.fetch_cached(
            SEARCH_PATH,
            &params,
            LIST_FAILURE_MESSAGE,
            Some,
            move |envelope: SearchEnvelope| envelope.response.into_page(page),
        )
        .await
    }

    async fn fetch_content(&self, id: &ArticleId) -> Result<ArticleDetail, ApiError> {
        let params = QueryParams::new()
            .with("api-key", self.config.api_key.resolve()?)
            .with("show-fields", &self.config.detail_fields);

        self.fetch_cached(
            &id.path(),
            &params,
            DETAIL_FAILURE_MESSAGE,
            content_payload,
            GuardianArticle::into_detail,
        )
        .await
    }

    /// Cache lookup, then retried fetch, then cache fill.
    ///
    /// `extract` selects the cached payload out of the response body and
    /// `convert` turns its wire shape into the domain value. A payload is only
    /// cached once it converts cleanly.
    async fn fetch_cached<W, T, C>(
        &self,
        path: &str,
        params: &QueryParams,
        failure_message: &str,
        extract: fn(Value) -> Option<Value>,
        convert: C,
    ) -> Result<T, ApiError>
    where
        W: DeserializeOwned,
        C: Fn(W) -> Result<T, ValidationError> + Copy,
    {
        let cache_key = generate_key(path, params);

        if self.cache_mode.reads() {
            if let Some(cached) = self.cache.get(&cache_key).await {
                match decode_payload::<W, T, C>(cached, convert) {
                    Ok(value) => {
                        tracing::debug!(path, "cache hit");
                        return Ok(value);
                    }
                    Err(failure) => {
                        tracing::warn!(
                            path,
                            error = %failure,
                            "discarding undecodable cache entry"
                        );
                    }
                }
            } else {
                tracing::debug!(path, "cache miss");
            }
        }

        let url = self.config.url_for(path, &params.to_encoded_string());
        let outcome = with_retry(&self.retry, || {
            self.fetch_once::<W, T, C>(&url, extract, convert)
        })
        .await;

        match outcome {
            Ok((payload, value)) => {
                if self.cache_mode.writes() {
                    self.cache.put(cache_key, payload).await;
                }
                Ok(value)
            }
            Err(failure) => {
                let error = classify(failure, ARTICLE_RESOURCE, failure_message);
                tracing::warn!(
                    path,
                    code = error.code(),
                    error = %error,
                    "content api request failed"
                );
                Err(error)
            }
        }
    }

    async fn fetch_once<W, T, C>(
        &self,
        url: &str,
        extract: fn(Value) -> Option<Value>,
        convert: C,
    ) -> Result<(Value, T), FetchFailure>
    where
        W: DeserializeOwned,
        C: Fn(W) -> Result<T, ValidationError>,
    {
        let request = HttpRequest::get(url)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.config.timeout_ms);

        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            return Err(FetchFailure::Response(response));
        }

        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| FetchFailure::Decode(format!("response is not json: {e}")))?;
        let payload = extract(body)
            .ok_or_else(|| FetchFailure::Decode(String::from("response has no content")))?;
        let value = decode_payload(payload.clone(), convert)?;

        Ok((payload, value))
    }
}

impl ArticleSource for GuardianGateway {
    fn fetch_list_page<'a>(
        &'a self,
        page: u32,
    ) -> Pin<Box<dyn Future<Output = Result<ArticlePage, ApiError>> + Send + 'a>> {
        Box::pin(self.fetch_search_page(page))
    }

    fn fetch_by_id<'a>(
        &'a self,
        id: &'a ArticleId,
    ) -> Pin<Box<dyn Future<Output = Result<ArticleDetail, ApiError>> + Send + 'a>> {
        Box::pin(self.fetch_content(id))
    }
}

fn decode_payload<W, T, C>(payload: Value, convert: C) -> Result<T, FetchFailure>
where
    W: DeserializeOwned,
    C: Fn(W) -> Result<T, ValidationError>,
{
    let wire: W = serde_json::from_value(payload)
        .map_err(|e| FetchFailure::Decode(format!("unexpected payload shape: {e}")))?;
    convert(wire).map_err(|e| FetchFailure::Decode(e.to_string()))
}

fn content_payload(mut body: Value) -> Option<Value> {
    let content = body.get_mut("response")?.get_mut("content")?;
    Some(content.take())
}

// Content API wire shapes

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    pages: u32,
    #[serde(default)]
    current_page: Option<u32>,
    #[serde(default)]
    results: Vec<GuardianArticle>,
}

impl SearchResponse {
    fn into_page(self, requested_page: u32) -> Result<ArticlePage, ValidationError> {
        let results = self
            .results
            .into_iter()
            .map(GuardianArticle::into_summary)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ArticlePage {
            status: self.status.unwrap_or_else(|| String::from("ok")),
            total: self.total,
            pages: self.pages,
            current_page: self.current_page.unwrap_or(requested_page),
            results,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuardianArticle {
    id: String,
    web_title: String,
    web_url: String,
    web_publication_date: String,
    #[serde(default)]
    section_name: String,
    #[serde(default)]
    fields: GuardianFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuardianFields {
    thumbnail: Option<String>,
    trail_text: Option<String>,
    body: Option<String>,
}

impl GuardianArticle {
    fn into_summary(self) -> Result<ArticleSummary, ValidationError> {
        Ok(ArticleSummary {
            id: ArticleId::parse(&self.id)?,
            title: self.web_title,
            url: self.web_url,
            published_at: UtcDateTime::parse(&self.web_publication_date)?,
            section_name: self.section_name,
            thumbnail: self.fields.thumbnail,
            trail_text: self.fields.trail_text,
        })
    }

    fn into_detail(self) -> Result<ArticleDetail, ValidationError> {
        Ok(ArticleDetail {
            id: ArticleId::parse(&self.id)?,
            title: self.web_title,
            url: self.web_url,
            published_at: UtcDateTime::parse(&self.web_publication_date)?,
            section_name: self.section_name,
            thumbnail: self.fields.thumbnail,
            trail_text: self.fields.trail_text,
            body: self.fields.body,
        })
    }
}
