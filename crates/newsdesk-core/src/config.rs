//! Content API configuration and fixed tuning constants.

use std::time::Duration;

use crate::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://content.guardianapis.com";

/// Environment variable holding the content API key.
pub const API_KEY_ENV: &str = "NEWSDESK_GUARDIAN_API_KEY";

/// Optional environment override for the API base URL.
pub const BASE_URL_ENV: &str = "NEWSDESK_GUARDIAN_BASE_URL";

pub const TECHNOLOGY_SECTION: &str = "technology";
pub const LIST_FIELDS: &str = "thumbnail,trailText";
pub const DETAIL_FIELDS: &str = "thumbnail,trailText,body";

/// Results per search page when no `page-size` is requested.
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const MAX_RETRIES: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Where the API key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Read the named environment variable on every call.
    Env(String),
    /// A fixed key supplied by the embedding program.
    Static(String),
}

impl ApiKeySource {
    /// Resolve the key now. A missing or blank key is a configuration error.
    pub fn resolve(&self) -> Result<String, ApiError> {
        let key = match self {
            Self::Env(name) => std::env::var(name).ok(),
            Self::Static(key) => Some(key.clone()),
        };

        key.map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ApiError::configuration("Guardian API key is not configured"))
    }
}

impl Default for ApiKeySource {
    fn default() -> Self {
        Self::Env(String::from(API_KEY_ENV))
    }
}

/// Settings for talking to the content API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub section: String,
    pub list_fields: String,
    pub detail_fields: String,
    pub api_key: ApiKeySource,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            section: String::from(TECHNOLOGY_SECTION),
            list_fields: String::from(LIST_FIELDS),
            detail_fields: String::from(DETAIL_FIELDS),
            api_key: ApiKeySource::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ApiConfig {
    /// Defaults plus the base URL override from the environment, if set.
    ///
    /// The API key is not read here; it is resolved on each call.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config = config.with_base_url(base_url);
            }
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_api_key(mut self, api_key: ApiKeySource) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn url_for(&self, path: &str, encoded_query: &str) -> String {
        if encoded_query.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}{path}?{encoded_query}", self.base_url)
        }
    }
}
