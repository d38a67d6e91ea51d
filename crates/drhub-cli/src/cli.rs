//! CLI argument definitions for drhub.
//!
//! Operator surface over the DR pipeline: run the scheduler, take a
//! one-shot snapshot, look up a single DR, or list reference data.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `run` | Run the scheduled refresh loop |
//! | `snapshot` | One full refresh, print a market summary |
//! | `quote` | Look up one DR in a fresh snapshot |
//! | `brokers` | List issuing brokers with DR counts |
//! | `news` | Latest news for one DR |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--offline` | `false` | No browser, no network; curated dataset only |

use clap::{Args, Parser, Subcommand, ValueEnum};

/// SET depositary-receipt market-data pipeline.
#[derive(Debug, Parser)]
#[command(
    name = "drhub",
    author,
    version,
    about = "Thai SET depositary-receipt market data pipeline",
    long_about = "drhub pulls the SET DR universe through a fallback chain of sources \
(SET endpoint via headless browser, ThaiWarrant HTML, curated dataset), classifies \
every receipt, and serves point-in-time snapshots.\n\
\n\
Use 'drhub <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Skip the browser and the network; serve the curated dataset.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the Bangkok-clock refresh loop until interrupted.
    ///
    /// Full refresh during the day session, price-only refresh during
    /// the night session, idle otherwise. Always starts with one full
    /// refresh.
    Run(RunArgs),

    /// Run one full refresh and print the market summary.
    Snapshot,

    /// Look up one DR in a freshly built snapshot.
    ///
    /// # Examples
    ///
    ///   drhub quote AAPL80
    ///   drhub quote TENCENT80 --format json --pretty
    Quote(QuoteArgs),

    /// List issuing brokers with their DR counts.
    Brokers,

    /// Latest news for one DR.
    News(NewsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Seconds between scheduler ticks.
    #[arg(long, default_value_t = 300)]
    pub cadence_secs: u64,
}

/// Arguments for the `quote` command.
#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// DR symbol (e.g. AAPL80).
    pub symbol: String,
}

/// Arguments for the `news` command.
#[derive(Debug, Args)]
pub struct NewsArgs {
    /// DR symbol (e.g. AAPL80).
    pub symbol: String,
}
