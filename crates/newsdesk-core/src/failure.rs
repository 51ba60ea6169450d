//! Raw fetch failures and their classification into [`ApiError`].

use std::fmt::{Display, Formatter};

use crate::http_client::{HttpError, HttpResponse, TransportErrorKind};
use crate::ApiError;

/// What went wrong on a single fetch attempt, before classification.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchFailure {
    /// A response arrived with a non-success status.
    Response(HttpResponse),
    /// No usable response: see [`TransportErrorKind`].
    Transport(HttpError),
    /// Already a typed error; classification leaves it alone.
    Classified(ApiError),
    /// A 2xx body that could not be decoded into the expected shape.
    Decode(String),
}

impl FetchFailure {
    /// Connection-level failures are the only ones worth retrying.
    pub fn is_connection_level(&self) -> bool {
        match self {
            Self::Transport(error) => error.is_connection_level(),
            Self::Classified(error) => matches!(error, ApiError::Network { .. }),
            Self::Response(_) | Self::Decode(_) => false,
        }
    }
}

impl Display for FetchFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Response(response) => write!(f, "status {}", response.status),
            Self::Transport(error) => write!(f, "transport: {error}"),
            Self::Classified(error) => write!(f, "{error} ({})", error.code()),
            Self::Decode(message) => write!(f, "decode: {message}"),
        }
    }
}

impl From<HttpError> for FetchFailure {
    fn from(error: HttpError) -> Self {
        Self::Transport(error)
    }
}

impl From<ApiError> for FetchFailure {
    fn from(error: ApiError) -> Self {
        Self::Classified(error)
    }
}

/// Map a terminal failure onto the error taxonomy.
///
/// Received responses win over connection failures, and typed errors pass
/// through untouched.
pub fn classify(failure: FetchFailure, resource: &str, fallback_message: &str) -> ApiError {
    match failure {
        FetchFailure::Response(response) if response.status == 404 => {
            ApiError::not_found(resource)
        }
        FetchFailure::Response(response) => {
            ApiError::api_with_response(fallback_message, response.status, response.body)
        }
        FetchFailure::Classified(error) => error,
        FetchFailure::Transport(error) => match error.kind() {
            TransportErrorKind::NoResponse => ApiError::network(),
            TransportErrorKind::Request => ApiError::api(fallback_message),
        },
        FetchFailure::Decode(_) => ApiError::api(fallback_message),
    }
}
