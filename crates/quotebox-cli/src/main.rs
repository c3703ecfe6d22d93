//! Quotebox CLI
//!
//! Command-line interface for Quotebox - a categorized quote collection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::Mutex;

use quotebox_core::{Config, QuoteBook, UNCATEGORIZED};

mod commands;
mod editor;
mod logging;
mod output;

use commands::sync::ResolveMode;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quotes")]
#[command(about = "Quotebox - a categorized quote collection")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to an alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a random quote (default)
    Show {
        /// Pick from this category instead of the saved filter
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Add a quote
    Add {
        /// Quote text (opens editor if not provided)
        text: Option<String>,
        /// Category for the quote
        #[arg(short, long, default_value = UNCATEGORIZED)]
        category: String,
    },
    /// List all categories
    #[command(alias = "ls")]
    Categories,
    /// Show or set the saved category filter
    Filter {
        /// Category name, or "all" to clear the filter
        category: Option<String>,
    },
    /// Import quotes from a JSON file
    Import {
        /// File containing a JSON array of quotes
        file: PathBuf,
    },
    /// Export all quotes as JSON
    Export {
        /// Destination file (stdout if omitted)
        file: Option<PathBuf>,
    },
    /// Sync with the remote feed
    Sync {
        /// How to settle conflicts
        #[arg(long, value_enum, default_value_t = ResolveMode::Review)]
        resolve: ResolveMode,
    },
    /// Show quotes and sync periodically until interrupted
    Watch {
        /// How to settle conflicts
        #[arg(long, value_enum, default_value_t = ResolveMode::Review)]
        resolve: ResolveMode,
        /// Seconds between syncs (default from config)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Show status (collection, sync and storage)
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, sync_url, sync_enabled, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work even when the current config is broken
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init(&config);

    let mut book = QuoteBook::open(&config);

    let command = cli.command.unwrap_or(Commands::Show { category: None });
    match command {
        Commands::Show { category } => commands::quote::show(&mut book, category, &mut output),
        Commands::Add { text, category } => {
            commands::quote::add(&mut book, text, category, &mut output)
        }
        Commands::Categories => commands::quote::categories(&book, &mut output),
        Commands::Filter { category } => commands::quote::filter(&mut book, category, &mut output),
        Commands::Import { file } => commands::transfer::import(&mut book, file, &output),
        Commands::Export { file } => commands::transfer::export(&book, file, &output),
        Commands::Sync { resolve } => {
            let book = Mutex::new(book);
            commands::sync::sync(&book, &config, resolve, &mut output).await
        }
        Commands::Watch { resolve, interval } => {
            let book = Mutex::new(book);
            commands::sync::watch(&book, &config, resolve, interval, &mut output).await
        }
        Commands::Status => commands::status::show(&book, &config, config_path, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
