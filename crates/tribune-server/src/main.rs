//! Tribune server entry point.
//!
//! Loads configuration, seeds the arena registry, and serves the REST
//! and `WebSocket` boundary until the process is terminated. All state
//! is in-memory and lost on restart.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `tribune.yaml` (or defaults)
//! 3. Build the arena registry and venue service
//! 4. Bind and serve

use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tribune_server::config::AppConfig;
use tribune_server::server::start_server;
use tribune_server::state::AppState;

/// Path the configuration is read from unless `TRIBUNE_CONFIG` says
/// otherwise.
const DEFAULT_CONFIG_PATH: &str = "tribune.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is malformed, the arena set is
/// inconsistent, or the server cannot bind.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("tribune-server starting");

    // Load configuration; a missing file means stock defaults.
    let config_path =
        std::env::var("TRIBUNE_CONFIG").unwrap_or_else(|_| String::from(DEFAULT_CONFIG_PATH));
    let config = if Path::new(&config_path).exists() {
        AppConfig::from_file(Path::new(&config_path))?
    } else {
        info!(path = %config_path, "no config file; using defaults");
        AppConfig::default()
    };
    info!(
        host = config.server.host,
        port = config.server.port,
        arenas = config.arenas.len(),
        emote_kinds = config.emotes.kinds,
        "configuration loaded"
    );

    // Build the registry and the venue service.
    let state = AppState::from_config(&config)?;
    for channel in state.service.registry().channels() {
        info!(channel = %channel, "arena ready");
    }

    // Serve until terminated.
    start_server(&config.server, state).await?;

    Ok(())
}
