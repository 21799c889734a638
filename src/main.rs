//! Binary entry point for the grocery tracker.
//!
//! Runs either the HTTP service or the interactive console menu.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use grocery_tracker::config::TrackerConfig;
use grocery_tracker::observability::{self, InitOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// Grocery Tracker - keep a shopping list from the terminal or over HTTP.
#[derive(Parser)]
#[command(name = "grocery")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run the JSON HTTP service.
    Serve {
        /// Port to listen on.
        #[arg(short, long)]
        port: Option<u16>,

        /// JSON file holding the list.
        #[arg(short, long)]
        data_file: Option<PathBuf>,
    },

    /// Run the interactive console menu.
    Menu,

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match TrackerConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Commands::Serve { port, data_file } = &cli.command {
        if let Some(port) = port {
            config = config.with_port(*port);
        }
        if let Some(data_file) = data_file {
            config = config.with_data_file(data_file.clone());
        }
    }

    let expose_metrics = matches!(cli.command, Commands::Serve { .. });
    let observability = match observability::init_from_config(
        &config,
        InitOptions {
            verbose: cli.verbose,
            metrics_expose: expose_metrics,
        },
    ) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to initialize observability: {e}");
            return ExitCode::FAILURE;
        },
    };
    tracing::debug!(metrics = observability.metrics_enabled(), "Observability initialized");

    let result = match cli.command {
        Commands::Serve { .. } => commands::cmd_serve(&config),
        Commands::Menu => commands::cmd_menu(),
        Commands::Config { show } => commands::cmd_config(&config, show),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}
