//! Screentime: a screen time analytics dashboard.
//!
//! This is the application entry point. It initializes tracing, loads configuration
//! from a TOML file, applies command line overrides, prepares the cached dataset
//! store and templates, sets up the Axum router and starts the HTTP server.
//! The server runs headless: it never opens a browser, sends no telemetry and
//! does not watch files.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use screentime::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use screentime::http::start_server;
use screentime::routes::create_router;
use screentime::state::AppState;
use screentime::store::DatasetStore;
use screentime::templates::init_templates;

/// Screentime: a web dashboard for children's screen time analytics
#[derive(Parser, Debug)]
#[command(name = "screentime", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "screentime=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Address to bind, overriding http.host
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overriding http.port
    #[arg(short, long)]
    port: Option<u16>,

    /// Dataset CSV path, overriding data.path
    #[arg(short, long)]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before tracing so the log format is known
    let mut config = AppConfig::load(&args.config)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    if let Some(host) = args.host {
        config.http.host = host;
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }
    if let Some(data) = args.data {
        config.data.path = data;
    }

    tracing::info!(
        config = %args.config,
        host = %config.http.host,
        port = config.http.port,
        tls = ?config.http.tls.mode,
        dataset = %config.data.path.display(),
        cache_ttl_seconds = config.data.cache_ttl_seconds,
        "Loaded configuration"
    );

    let tera = init_templates(&config.ui.template_glob())?;
    tracing::info!(templates = %config.ui.template_glob(), "Initialized templates");

    let store = DatasetStore::new(&config.data);
    store.preload().await;

    let state = AppState::new(config.clone(), tera, store);
    let app = create_router(state);

    start_server(app, &config).await?;

    tracing::info!("Server stopped");
    Ok(())
}
