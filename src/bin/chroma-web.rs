//! Chroma Palette Web Server Binary
//!
//! This binary starts the HTTP API consumed by the palette front-end.
//!
//! # Usage
//!
//! ```bash
//! # Start with settings from config.toml (default 127.0.0.1:3001)
//! chroma-web
//!
//! # Override address and usage store
//! chroma-web --port 8080 --store file
//! ```

use std::net::SocketAddr;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chroma_palette::config::{Config, StoreKind};
use chroma_palette::web;

/// Chroma Palette Web Server - REST API for the palette editor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (defaults to server.port from the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (defaults to server.host from the config file)
    #[arg(long)]
    host: Option<String>,

    /// Usage store: memory, file or disabled (defaults to usage.store)
    #[arg(long, value_name = "STORE")]
    store: Option<StoreKind>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(store) = args.store {
        config.usage.store = store;
    }
    config.validate()?;

    info!(
        "Environment: {}, usage store: {}",
        config.server.environment, config.usage.store
    );

    // Build socket address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = web::AppState::new(&config)?;
    web::run_server(state, addr).await
}
