//! Interactive reader driven by line commands on stdin.

use std::io::Write;
use std::sync::Arc;

use newsdesk_core::{
    ArticleSummary, DetailLoader, DetailOutcome, InfiniteFeed, ListLoader, LoadOutcome, LoadPhase,
    ObserverOptions, Viewport,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{BrowseArgs, Cli};
use crate::error::CliError;

use super::build_gateway;

const HELP: &str = "commands: more | open <n> | back | reload | clear-cache | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseCommand {
    More,
    Open(usize),
    Back,
    Reload,
    ClearCache,
    Help,
    Quit,
    Nothing,
}

impl BrowseCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Self::Nothing);
        };

        let parsed = match command {
            "more" | "m" => Self::More,
            "open" | "o" => {
                let raw = words
                    .next()
                    .ok_or_else(|| String::from("usage: open <n>"))?;
                let index = raw
                    .parse::<usize>()
                    .ok()
                    .filter(|index| *index > 0)
                    .ok_or_else(|| format!("not an item number: {raw}"))?;
                Self::Open(index)
            }
            "back" | "b" => Self::Back,
            "reload" | "r" => Self::Reload,
            "clear-cache" => Self::ClearCache,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => return Err(format!("unknown command: {other} ({HELP})")),
        };

        if words.next().is_some() {
            return Err(format!("unexpected arguments after {command}"));
        }
        Ok(parsed)
    }
}

pub async fn run(args: &BrowseArgs, cli: &Cli) -> Result<(), CliError> {
    let gateway = Arc::new(build_gateway(cli)?);
    let mut feed = InfiniteFeed::new(
        ListLoader::new(gateway.clone()),
        ObserverOptions::default(),
    );
    let detail = DetailLoader::new(gateway.clone());

    let outcome = feed.start().await;
    report_list(&feed, &outcome, 0)?;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match BrowseCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            BrowseCommand::More => {
                let before = feed.state().items.len();
                let outcome = feed
                    .scroll(Viewport::at_end(before, args.viewport_height))
                    .await;
                report_list(&feed, &outcome, before)?;
            }
            BrowseCommand::Open(number) => {
                let state = feed.state();
                let Some(item) = state.items.get(number - 1) else {
                    println!("no item {number}; {} loaded", state.items.len());
                    continue;
                };
                let outcome = detail.load(&item.id).await;
                report_detail(&detail, &outcome)?;
            }
            BrowseCommand::Back => {
                detail.clear();
                print_items(&feed.state().items, 0);
            }
            BrowseCommand::Reload => {
                let outcome = feed.reload().await;
                report_list(&feed, &outcome, 0)?;
            }
            BrowseCommand::ClearCache => {
                gateway.cache().clear().await;
                println!("cache cleared");
            }
            BrowseCommand::Help => println!("{HELP}"),
            BrowseCommand::Quit => break,
            BrowseCommand::Nothing => {}
        }
    }

    feed.release();
    detail.clear();
    Ok(())
}

fn report_list(feed: &InfiniteFeed, outcome: &LoadOutcome, from: usize) -> Result<(), CliError> {
    let state = feed.state();
    match outcome {
        LoadOutcome::Loaded { received: 0, .. } => println!("no more articles"),
        LoadOutcome::Loaded { .. } => print_items(&state.items, from),
        LoadOutcome::Failed(error) => {
            if let Some(fatal) = CliError::from_fatal(error) {
                return Err(fatal);
            }
            println!("error: {error} (type 'reload' to try again)");
        }
        LoadOutcome::Skipped if state.phase == LoadPhase::Failed => {
            println!("last load failed: type 'reload' to try again");
        }
        LoadOutcome::Skipped if !state.has_more => println!("no more articles"),
        LoadOutcome::Skipped => println!("already loading or nothing new in view"),
        LoadOutcome::Discarded { .. } => {}
    }
    Ok(())
}

fn report_detail(detail: &DetailLoader, outcome: &DetailOutcome) -> Result<(), CliError> {
    match outcome {
        DetailOutcome::Loaded => {
            let Some(article) = detail.snapshot().article else {
                return Ok(());
            };
            let heading = article.summary();
            println!();
            println!("{}", heading.title);
            println!("{} | {}", heading.published_at.date_label(), heading.section_name);
            println!("{}", heading.url);
            if let Some(trail_text) = &heading.trail_text {
                println!();
                println!("{trail_text}");
            }
            if let Some(body) = &article.body {
                println!();
                println!("{body}");
            }
            println!();
            println!("(back to return to the list)");
        }
        DetailOutcome::Failed(error) => {
            if let Some(fatal) = CliError::from_fatal(error) {
                return Err(fatal);
            }
            println!("error: {error}");
        }
        DetailOutcome::Discarded => {}
    }
    Ok(())
}

fn print_items(items: &[ArticleSummary], from: usize) {
    for (index, item) in items.iter().enumerate().skip(from) {
        println!(
            "{:>4}. {}  {}",
            index + 1,
            item.published_at.date_label(),
            item.title
        );
    }
}
