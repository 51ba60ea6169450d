use std::time::Instant;

use newsdesk_core::{ArticlePage, ArticleSource, GuardianGateway};
use serde::Serialize;

use crate::cli::ListArgs;
use crate::error::CliError;

use super::{elapsed_ms, CommandResult};

#[derive(Debug, Serialize)]
struct ListResponseData {
    page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<ArticlePage>,
}

pub async fn run(args: &ListArgs, gateway: &GuardianGateway) -> Result<CommandResult, CliError> {
    let started = Instant::now();

    match gateway.fetch_list_page(args.page).await {
        Ok(page) => {
            let empty = page.is_empty();
            let data = serde_json::to_value(ListResponseData {
                page: args.page,
                result: Some(page),
            })?;
            let mut result = CommandResult::ok(data).with_latency(elapsed_ms(started));
            if empty {
                result = result.with_warning(format!("page {} has no articles", args.page));
            }
            Ok(result)
        }
        Err(error) => {
            let data = serde_json::to_value(ListResponseData {
                page: args.page,
                result: None,
            })?;
            Ok(CommandResult::failed(data, &error)?.with_latency(elapsed_ms(started)))
        }
    }
}
