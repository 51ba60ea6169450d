use std::sync::Arc;
use std::time::Instant;

use newsdesk_core::{
    ArticleSummary, GuardianGateway, InfiniteFeed, ListLoader, LoadOutcome, LoadPhase,
    ObserverOptions, Viewport,
};
use serde::Serialize;

use crate::cli::FeedArgs;
use crate::error::CliError;

use super::{elapsed_ms, CommandResult};

#[derive(Debug, Serialize)]
struct FeedResponseData {
    current_page: u32,
    has_more: bool,
    phase: LoadPhase,
    items: Vec<ArticleSummary>,
}

pub async fn run(
    args: &FeedArgs,
    gateway: Arc<GuardianGateway>,
) -> Result<CommandResult, CliError> {
    let started = Instant::now();
    let options = ObserverOptions {
        root_margin: args.margin,
        enabled: true,
    };
    let mut feed = InfiniteFeed::new(ListLoader::new(gateway), options);

    let mut last = feed.start().await;
    loop {
        let state = feed.state();
        if state.phase != LoadPhase::Succeeded
            || !state.has_more
            || state.current_page >= args.pages
        {
            break;
        }

        last = feed.scroll(Viewport::at_end(state.items.len(), args.viewport_height)).await;
        if last.is_skipped() {
            break;
        }
    }
    feed.release();

    let state = feed.state();
    let data = serde_json::to_value(FeedResponseData {
        current_page: state.current_page,
        has_more: state.has_more,
        phase: state.phase,
        items: state.items,
    })?;

    let result = match &last {
        LoadOutcome::Failed(error) => CommandResult::failed(data, error)?,
        LoadOutcome::Skipped | LoadOutcome::Loaded { .. } | LoadOutcome::Discarded { .. } => {
            let mut result = CommandResult::ok(data);
            if !state.has_more {
                result = result.with_warning("feed exhausted before the requested page count");
            }
            result
        }
    };

    Ok(result.with_latency(elapsed_ms(started)))
}
