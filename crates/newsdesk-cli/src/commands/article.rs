use std::sync::Arc;
use std::time::Instant;

use newsdesk_core::{ArticleId, DetailLoader, DetailOutcome, GuardianGateway};

use crate::cli::ArticleArgs;
use crate::error::CliError;

use super::{elapsed_ms, CommandResult};

pub async fn run(
    args: &ArticleArgs,
    gateway: Arc<GuardianGateway>,
) -> Result<CommandResult, CliError> {
    let id = ArticleId::parse(&args.id)?;
    let started = Instant::now();

    let detail = DetailLoader::new(gateway);
    let outcome = detail.load(&id).await;
    let data = serde_json::to_value(detail.snapshot())?;

    let result = match &outcome {
        DetailOutcome::Failed(error) => CommandResult::failed(data, error)?,
        DetailOutcome::Loaded | DetailOutcome::Discarded => CommandResult::ok(data),
    };

    Ok(result.with_latency(elapsed_ms(started)))
}
