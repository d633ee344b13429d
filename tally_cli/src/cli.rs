//! CLI definition using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "tally")]
#[command(version)]
#[command(about = "Construction material quantities and costs, with the formula behind every number")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (JSON: precision, currency)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every calculator
    List,

    /// Show the inputs, prices and constants of one calculator
    Describe {
        /// Calculator id (e.g. "brick-wall")
        id: String,
    },

    /// Run a calculator
    Compute {
        /// Calculator id (e.g. "brick-wall")
        id: String,

        /// Input field, repeatable (e.g. -i wall_length=5)
        #[arg(long = "input", short = 'i', value_parser = parse_key_value)]
        inputs: Vec<(String, String)>,

        /// Unit price, repeatable (e.g. -p brick_price=8)
        #[arg(long = "price", short = 'p', value_parser = parse_key_value)]
        prices: Vec<(String, String)>,

        /// Append the result to this history file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Browse saved calculations
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List saved calculations, oldest first
    List {
        /// History file
        #[arg(long)]
        store: PathBuf,
    },

    /// Show one saved calculation
    Show {
        /// Session id
        id: String,

        /// History file
        #[arg(long)]
        store: PathBuf,
    },
}

/// Parse `key=value`; the value may be empty.
fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", arg)),
    }
}
