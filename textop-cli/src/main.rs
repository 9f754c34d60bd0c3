//! textop CLI: inspect and run the word2vec text transformer from the terminal.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// textop: word2vec text featurization with JSON-Schema metadata
#[derive(Parser, Debug)]
#[command(name = "textop", version, about, long_about = None)]
struct Cli {
    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the operator's schema documents
    Schema {
        /// Which part of the combined schema to print
        #[arg(short, long, value_enum, default_value = "combined")]
        part: SchemaPartArg,
    },
    /// Print hyperparameter defaults
    Defaults,
    /// Check a hyperparameter file against the operator schema
    Validate {
        /// JSON file holding a hyperparameter object
        params: PathBuf,
    },
    /// Fit the transformer and write the transformed samples
    Run {
        /// Samples to transform (csv, tsv, json, jsonl)
        #[arg(short, long)]
        data: PathBuf,
        /// Samples to fit on (defaults to --data)
        #[arg(long)]
        fit_data: Option<PathBuf>,
        /// JSON file holding a hyperparameter object
        #[arg(short, long)]
        params: Option<PathBuf>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SchemaPartArg {
    Combined,
    Hyperparams,
    InputFit,
    InputTransform,
    OutputTransform,
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create a default configuration file
    Init,
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let config = commands::load_effective_config(&workspace, cli.config.as_deref())?;

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Human-readable layer for stderr (always active)
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    // Optional JSON file layer for structured logging
    let (json_layer, _guard) = if config.logging.json_file {
        let log_dir = config
            .logging
            .log_dir
            .clone()
            .unwrap_or_else(textop_ml::config::default_log_dir);
        let _ = std::fs::create_dir_all(&log_dir);
        let file_appender = tracing_appender::rolling::daily(&log_dir, "textop.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_filter(EnvFilter::new("debug"));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    commands::handle_command(cli.command, &workspace, &config).await
}
