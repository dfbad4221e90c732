//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stockex")]
#[command(author, version, about = "Indicator signals and strategy simulation over daily prices")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "STOCKEX_CONFIG")]
    pub config: PathBuf,

    /// Log level (defaults to the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate a configured strategy over a date range
    Simulate(SimulateArgs),
    /// Show the buy/sell events a strategy generates
    Signals(SignalsArgs),
    /// List indicators or compute indicator values
    Indicators(IndicatorsArgs),
    /// Validate configuration
    ValidateConfig,
}

/// Options shared by commands that read price data.
#[derive(clap::Args)]
pub struct DataArgs {
    /// Directory of per-instrument CSV files (defaults to the configured directory)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Instrument codes (comma-separated); all instruments when omitted
    #[arg(short = 'I', long, value_delimiter = ',')]
    pub instruments: Vec<String>,
}

#[derive(clap::Args)]
pub struct SimulateArgs {
    /// Strategy name from the configuration
    #[arg(short, long)]
    pub strategy: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Start budget (defaults to the configured budget)
    #[arg(long)]
    pub budget: Option<Decimal>,

    /// Maximum spent on a single buy
    #[arg(long)]
    pub transaction_limit: Option<Decimal>,

    #[command(flatten)]
    pub data: DataArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save the JSON result to a file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SignalsArgs {
    /// Strategy name from the configuration
    #[arg(short, long)]
    pub strategy: String,

    /// Start date (YYYY-MM-DD); `--days` before the end date when omitted
    #[arg(long, conflicts_with = "on")]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD); the latest price date when omitted
    #[arg(long, conflicts_with = "on")]
    pub end: Option<NaiveDate>,

    /// Calendar days covered when no start date is given
    #[arg(long, default_value = "30")]
    pub days: u64,

    /// Show the signals of a single date, using all loaded history
    #[arg(long)]
    pub on: Option<NaiveDate>,

    #[command(flatten)]
    pub data: DataArgs,

    /// Print events as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct IndicatorsArgs {
    /// Indicator to describe or compute (e.g. atr, macd)
    pub name: Option<String>,

    /// Indicator parameters as Name=Value (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub params: Vec<String>,

    /// Compute values for the selected instruments
    #[arg(long)]
    pub compute: bool,

    /// Number of most recent values to print per instrument
    #[arg(long, default_value = "10")]
    pub last: usize,

    #[command(flatten)]
    pub data: DataArgs,
}
