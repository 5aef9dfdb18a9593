//! Wayfinder Service - HTTP location API.
//!
//! Run with: `cargo run -p wayfinder-service`

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use wayfinder_service::{AppState, Config, api, config::SCRAPER_API_KEY_ENV};
use wayfinder_store::Store;

/// Wayfinder Service - Service BC and Health BC location API.
#[derive(Parser, Debug)]
#[command(name = "wayfinder-service")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Bind address (overrides config).
    #[arg(short, long, global = true)]
    bind: Option<String>,

    /// Database path (overrides config).
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API in the foreground (default behavior).
    Run,

    /// Seed the store from a JSON array of location records.
    Import {
        /// JSON file to import.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wayfinder_service=info".parse()?)
                .add_directive("wayfinder_store=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let config = load_config(&args)?;

    match args.command {
        Some(Command::Import { ref file }) => import(&config, file),
        Some(Command::Run) | None => run_server(config).await,
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };

    if let Some(bind) = &args.bind {
        config.server.bind = bind.clone();
    }
    if let Some(db_path) = &args.database {
        config.storage.path = db_path.clone();
    }
    config.apply_scraper_key_override(std::env::var(SCRAPER_API_KEY_ENV).ok());

    config.validate()?;
    Ok(config)
}

fn import(config: &Config, file: &Path) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let store = Store::open(&config.storage.path)?;
    let result = store
        .import_json(&json)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    println!(
        "Processed {} entries: {} created, {} updated, {} rejected",
        result.total(),
        result.created,
        result.updated,
        result.rejected.len()
    );
    for rejection in &result.rejected {
        println!("  rejected {}", rejection);
    }
    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let store = Store::open(&config.storage.path)
        .with_context(|| format!("Failed to open {}", config.storage.path.display()))?;

    if config.security.scraper_api_key.is_none() {
        warn!(
            "No scraper API key configured (set {}); PATCH /locations will be refused",
            SCRAPER_API_KEY_ENV
        );
    }

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;

    let state = AppState::new(store, config);

    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
