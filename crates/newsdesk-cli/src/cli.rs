//! CLI argument definitions for newsdesk.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `list` | Fetch one page of technology articles |
//! | `feed` | Scroll through the feed until enough pages are loaded |
//! | `article` | Fetch one article with its body |
//! | `browse` | Interactive reader on stdin |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `10000` | Per-request timeout in ms |
//! | `--cache` | `use` | Cache behavior (use, refresh, bypass) |
//! | `-v` | off | Log verbosity, repeat for more |
//!
//! # Examples
//!
//! ```bash
//! export NEWSDESK_GUARDIAN_API_KEY=...
//!
//! newsdesk list --page 2 --pretty
//! newsdesk feed --pages 3 --format table
//! newsdesk article technology/2024/jan/15/some-article
//! newsdesk -v browse
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use newsdesk_core::config::DEFAULT_TIMEOUT_MS;
use newsdesk_core::CacheMode;

/// Technology news from the Guardian content API.
#[derive(Debug, Parser)]
#[command(
    name = "newsdesk",
    author,
    version,
    about = "Technology news from the Guardian content API",
    long_about = "newsdesk reads the technology section of the Guardian content API.\n\
\n\
The API key is read from NEWSDESK_GUARDIAN_API_KEY. Responses are cached in memory \
for five minutes and connection failures are retried three times, one second apart."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-request timeout in milliseconds.
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_TIMEOUT_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_ms: u64,

    /// How responses are read from and written to the cache.
    #[arg(long, global = true, value_enum, default_value_t = CacheArg::Use)]
    pub cache: CacheArg,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheArg {
    /// Serve fresh cache entries, fill the cache on misses.
    Use,
    /// Always fetch, then overwrite the cache.
    Refresh,
    /// Never read or write the cache.
    Bypass,
}

impl From<CacheArg> for CacheMode {
    fn from(value: CacheArg) -> Self {
        match value {
            CacheArg::Use => Self::Use,
            CacheArg::Refresh => Self::Refresh,
            CacheArg::Bypass => Self::Bypass,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one page of technology articles.
    List(ListArgs),
    /// Load pages the way an infinitely scrolling view would.
    Feed(FeedArgs),
    /// Fetch a single article by its content id.
    Article(ArticleArgs),
    /// Read interactively: list, open, go back, reload.
    Browse(BrowseArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number, starting at 1.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
}

#[derive(Debug, Args)]
pub struct FeedArgs {
    /// Stop after this many pages are loaded.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Rows visible at once.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub viewport_height: u32,

    /// Rows past the viewport that already count as visible.
    #[arg(long, default_value_t = newsdesk_core::viewport::DEFAULT_ROOT_MARGIN)]
    pub margin: u32,
}

#[derive(Debug, Args)]
pub struct ArticleArgs {
    /// Content id, e.g. `technology/2024/jan/15/some-article`.
    pub id: String,
}

#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Rows visible at once when asking for more.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub viewport_height: u32,
}
