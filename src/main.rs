//! Static file server with alias rules.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ resolve::Resolver ──▶ http::files ──▶ disk
//!                     (decode path)    (alias::RuleSet,      (stat, stream,
//!                                       containment)          index/listing)
//!
//!     config file ──▶ config::loader ──▶ config::watcher ──▶ resolver hot swap
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use static_alias::config::{load_config, watcher::ConfigWatcher, ConfigOverrides, ServerConfig};
use static_alias::lifecycle::{shutdown_signal, Shutdown};
use static_alias::observability::{logging, metrics};
use static_alias::HttpServer;

#[derive(Parser)]
#[command(name = "static-alias")]
#[command(about = "Static file server with ordered alias rules", long_about = None)]
struct Cli {
    /// TOML configuration file; watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured root directory.
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        root: cli.root.clone(),
        bind_address: cli.bind.clone(),
    };
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    let config = overrides.apply(config);

    logging::init_logging(&config.observability.log_level);
    tracing::info!("static-alias v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        root = %config.root.display(),
        bind_address = %config.listener.bind_address,
        rules = config.alias.as_slice().len(),
        "Configuration loaded"
    );
    if !overrides.is_empty() {
        tracing::info!(?overrides, "Command-line overrides apply to every reload");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Hold the watcher for the lifetime of the server.
    let (config_updates, _watcher) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path, overrides);
            (updates, Some(watcher.run()?))
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
