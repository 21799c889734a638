//! Command handlers for the `grocery` binary.

use anyhow::Context;
use grocery_tracker::config::{TrackerConfig, default_config_path};
use grocery_tracker::console::ConsoleSession;
use grocery_tracker::http::HttpServer;
use grocery_tracker::services::GroceryService;
use grocery_tracker::storage::FileStore;
use std::io;

/// Runs the HTTP service until Ctrl-C.
pub fn cmd_serve(config: &TrackerConfig) -> anyhow::Result<()> {
    let store = FileStore::new(&config.data_file);
    let service = GroceryService::open(Box::new(store))
        .with_context(|| format!("loading {}", config.data_file.display()))?;

    let server = HttpServer::new(service)
        .with_host(config.host)
        .with_port(config.port);
    println!("Server running on port {}", config.port);

    server.run().context("running HTTP server")
}

/// Runs the console menu over stdin and stdout.
pub fn cmd_menu() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut session = ConsoleSession::new(stdin.lock(), io::stdout());
    session.run().context("console session")
}

/// Prints the effective configuration.
pub fn cmd_config(config: &TrackerConfig, show: bool) -> anyhow::Result<()> {
    if !show {
        println!("Use --show to display the current configuration");
        return Ok(());
    }

    println!("Current Configuration");
    println!("=====================");
    println!();
    println!(
        "Default Config Path: {}",
        default_config_path().map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
    );
    println!("Listen Address: {}:{}", config.host, config.port);
    println!("Data File: {}", config.data_file.display());
    println!();
    println!("Logging:");
    println!("  Format: {}", config.logging.format.as_str());
    println!("  Level: {}", config.logging.level);
    println!(
        "  File: {}",
        config
            .logging
            .file
            .as_ref()
            .map_or_else(|| "(stderr)".to_string(), |p| p.display().to_string())
    );
    println!();
    println!("Metrics:");
    println!("  Enabled: {}", config.metrics.enabled);
    println!("  Port: {}", config.metrics.port);

    Ok(())
}
