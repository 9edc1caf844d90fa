//! tourguide: chat backend for the Tây Ninh tour guide widget.
//!
//! Accepts WebSocket connections, keeps one conversation per visitor
//! session, and answers questions through the Gemini API enriched with the
//! local tourism data, place photos and the current weather.

mod app;
mod cli;
mod connection;
mod protocol;
mod render;
mod turn;

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tourguide_ai::{GeminiClient, GeminiConfig};
use tourguide_common::{ConfigError, TourGuideError};
use tourguide_config::TourGuideConfig;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::cli::Args;
use crate::connection::handle_connection;

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Workspace root, two levels up from crates/tourguide-server/
        manifest_dir.join("..").join("..").join(".env"),
        std::path::PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

/// Load and validate the config, falling back to defaults on any error.
fn load_config(args: &Args) -> (TourGuideConfig, Option<ConfigError>) {
    let loaded = match &args.config {
        Some(path) => tourguide_config::load_config_from(path),
        None => tourguide_config::load_config(),
    };
    let (mut config, error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (TourGuideConfig::default(), Some(e)),
    };

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = &args.data_dir {
        config.data.dir = dir.clone();
    }
    (config, error)
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{directive},hyper=warn,reqwest=warn,tungstenite=warn"))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: TourGuideConfig) -> tourguide_common::Result<()> {
    let provider = &config.provider;
    let mut gemini = GeminiConfig::from_env(&provider.api_key_env)
        .map_err(|_| ConfigError::MissingCredential(provider.api_key_env.clone()))?
        .with_request_timeout(Duration::from_secs(provider.timeout_secs.into()));
    if let Some(url) = &provider.base_url {
        gemini = gemini.with_base_url(url.clone());
    }
    let client = GeminiClient::new(gemini).map_err(|e| TourGuideError::Ai(e.to_string()))?;

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let idle = Duration::from_secs(config.server.session_idle_secs.into());
    let app = Arc::new(App::new(config, Arc::new(client)));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("tourguide listening on {}", addr);

    // Spawn idle session reaper.
    let reaper_app = app.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let reaped = reaper_app.sessions.reap_idle(idle).await;
            let count = reaper_app.sessions.count().await;
            tracing::debug!(reaped, sessions = count, "Reaper tick");
        }
    });

    // Accept loop.
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let app = app.clone();
                tokio::spawn(async move {
                    match accept_async(stream).await {
                        Ok(ws) => handle_connection(ws, addr, app).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file before anything else
    load_dotenv();

    let args = cli::parse();
    let (config, config_error) = load_config(&args);

    if args.print_config {
        if let Some(e) = &config_error {
            eprintln!("Config load failed, showing defaults: {e}");
        }
        println!("{}", tourguide_config::config_to_json(&config));
        return;
    }

    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.as_directive().to_string());
    init_logging(&directive);

    tracing::info!(
        schema = tourguide_config::CONFIG_SCHEMA_VERSION,
        "tourguide v{} starting...",
        env!("CARGO_PKG_VERSION")
    );
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    if let Err(e) = run(config).await {
        tracing::error!("tourguide stopped: {e}");
        std::process::exit(1);
    }
}
