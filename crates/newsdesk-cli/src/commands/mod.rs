mod article;
pub mod browse;
mod feed;
mod list;

use std::sync::Arc;
use std::time::Instant;

use newsdesk_core::{
    ApiConfig, ApiError, CacheStore, Envelope, EnvelopeError, GuardianGateway, ReqwestHttpClient,
};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::{Metadata, RequestId};

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
        }
    }

    /// Envelope payload for a failed API call. Configuration failures abort instead.
    pub fn failed(data: Value, error: &ApiError) -> Result<Self, CliError> {
        if let Some(fatal) = CliError::from_fatal(error) {
            return Err(fatal);
        }
        Ok(Self::ok(data).with_errors(vec![EnvelopeError::from(error)]))
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

/// Gateway wired to the live API with the flags from `cli`.
pub fn build_gateway(cli: &Cli) -> Result<GuardianGateway, CliError> {
    let http_client =
        ReqwestHttpClient::new().map_err(|error| CliError::Command(error.to_string()))?;
    let config = ApiConfig::from_env().with_timeout_ms(cli.timeout_ms);

    Ok(
        GuardianGateway::new(Arc::new(http_client), CacheStore::with_default_ttl(), config)
            .with_cache_mode(cli.cache.into()),
    )
}

pub fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let request_id = RequestId::new_v4();
    tracing::debug!(%request_id, "running command");

    let gateway = Arc::new(build_gateway(cli)?);

    let command_result = match &cli.command {
        Command::List(args) => list::run(args, gateway.as_ref()).await?,
        Command::Feed(args) => feed::run(args, gateway).await?,
        Command::Article(args) => article::run(args, gateway).await?,
        Command::Browse(_) => {
            return Err(CliError::Command(String::from(
                "browse is interactive and has no envelope output",
            )))
        }
    };

    let CommandResult {
        data,
        warnings,
        errors,
        latency_ms,
    } = command_result;

    let mut metadata = Metadata::new(request_id, latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    Envelope::with_errors(metadata.into_envelope_meta()?, data, errors).map_err(CliError::from)
}
