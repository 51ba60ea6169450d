use thiserror::Error;

/// Validation and contract errors exposed by `newsdesk-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("article id cannot be empty")]
    EmptyArticleId,
    #[error("article id length {len} exceeds max {max}")]
    ArticleIdTooLong { len: usize, max: usize },
    #[error("article id contains invalid character '{ch}' at index {index}")]
    ArticleIdInvalidChar { ch: char, index: usize },
    #[error("article id must be a relative content path: '{value}'")]
    ArticleIdNotRelative { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Typed failure surfaced by the article data gateway.
///
/// The variant set is closed: callers decide what to show by matching on it,
/// never by inspecting messages.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// The request went out but no response came back.
    #[error("{message}")]
    Network { message: String },

    /// The API answered 404 for the requested resource.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Any other non-success status or unclassified failure.
    #[error("{message}")]
    Api {
        message: String,
        status: Option<u16>,
        payload: Option<String>,
    },

    /// Required configuration is missing. Raised before any request is made.
    #[error("{message}")]
    Configuration { message: String },
}

impl ApiError {
    pub fn network() -> Self {
        Self::Network {
            message: String::from("Network error occurred"),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            status: None,
            payload: None,
        }
    }

    pub fn api_with_response(
        message: impl Into<String>,
        status: u16,
        payload: impl Into<String>,
    ) -> Self {
        Self::Api {
            message: message.into(),
            status: Some(status),
            payload: Some(payload.into()),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// HTTP status associated with the failure, if any.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => *status,
            Self::Network { .. } | Self::Configuration { .. } => None,
        }
    }

    /// Raw response body that accompanied the failure, if any.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Api { payload, .. } => payload.as_deref(),
            Self::Network { .. } | Self::NotFound { .. } | Self::Configuration { .. } => None,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Network { .. } => "api.network",
            Self::NotFound { .. } => "api.not_found",
            Self::Api { .. } => "api.error",
            Self::Configuration { .. } => "api.configuration",
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    pub const fn retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_fixed_status_and_resource_message() {
        let error = ApiError::not_found("Article");

        assert_eq!(error.status(), Some(404));
        assert_eq!(error.to_string(), "Article not found");
        assert_eq!(error.code(), "api.not_found");
        assert!(!error.retryable());
    }

    #[test]
    fn api_error_exposes_status_and_payload() {
        let error =
            ApiError::api_with_response("Failed to fetch tech news", 500, "{\"message\":\"boom\"}");

        assert_eq!(error.status(), Some(500));
        assert_eq!(error.payload(), Some("{\"message\":\"boom\"}"));
        assert_eq!(error.to_string(), "Failed to fetch tech news");
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(ApiError::network().retryable());
        assert!(!ApiError::api("x").retryable());
        assert!(!ApiError::configuration("x").retryable());
        assert_eq!(ApiError::network().status(), None);
    }
}
