//! Outline Server
//!
//! Serves a collaborative outline over HTTP: a tree of text nodes with
//! change polling, plus the static UI assets.

use clap::{Arg, Command};
use outline_server::api::start_server;
use outline_server::{Config, OutlineStore, Result};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("outline-server")
        .version(outline_server::VERSION)
        .about("Collaborative outline server with HTTP change polling.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("http-addr")
                .long("http-addr")
                .value_name("ADDR")
                .help("HTTP server bind address"),
        )
        .arg(
            Arg::new("assets-dir")
                .long("assets-dir")
                .value_name("DIR")
                .help("Static asset directory"),
        )
        .arg(
            Arg::new("root-text")
                .long("root-text")
                .value_name("TEXT")
                .help("Text of the root outline node"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .get_matches();

    // Load configuration
    let mut config = if let Some(config_path) = matches.get_one::<String>("config") {
        Config::from_file(config_path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    apply_cli_overrides(&mut config, &matches)?;
    config.validate()?;

    // Initialize logging
    outline_server::init_tracing(&config.logging.level);

    info!("Starting Outline Server v{}", env!("CARGO_PKG_VERSION"));

    // The store is created once here and lives for the whole process;
    // the transport layer only ever sees this shared handle.
    let store = Arc::new(OutlineStore::new(&config.outline));
    info!(
        root_text = %config.outline.root_text,
        retention_secs = config.outline.retention_secs,
        "Outline store initialized"
    );

    start_server(config.server.http_addr, store, &config.assets.dir).await?;

    info!("Shutdown complete");
    Ok(())
}

/// Apply command line argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, matches: &clap::ArgMatches) -> Result<()> {
    if let Some(addr) = matches.get_one::<String>("http-addr") {
        config.server.http_addr = addr
            .parse()
            .map_err(|e| outline_server::Error::config(format!("Invalid HTTP address: {}", e)))?;
    }

    if let Some(dir) = matches.get_one::<String>("assets-dir") {
        config.assets.dir = dir.into();
    }

    if let Some(text) = matches.get_one::<String>("root-text") {
        config.outline.root_text = text.clone();
    }

    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.clone();
    }

    Ok(())
}
