use newsdesk_core::ApiError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] newsdesk_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
            Self::Configuration(_) => 12,
        }
    }

    /// Configuration failures abort the command; every other API error is
    /// reported inside the envelope.
    pub fn from_fatal(error: &ApiError) -> Option<Self> {
        match error {
            ApiError::Configuration { message } => Some(Self::Configuration(message.clone())),
            ApiError::Network { .. } | ApiError::NotFound { .. } | ApiError::Api { .. } => None,
        }
    }
}
