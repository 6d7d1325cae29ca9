//! Typed configuration for the Tribune server.
//!
//! The canonical configuration lives in `tribune.yaml` at the project
//! root. This module defines strongly-typed structs mirroring the YAML
//! structure and a loader that reads the file. Every section has a
//! default, so an empty or absent file yields a runnable server seeded
//! with the stock venues.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Listen address settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// The fixed set of venues to create at startup.
    #[serde(default = "default_arenas")]
    pub arenas: Vec<ArenaConfig>,

    /// Emote asset-set settings.
    #[serde(default)]
    pub emotes: EmoteConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            arenas: default_arenas(),
            emotes: EmoteConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.server.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.server.apply_env_overrides();
        Ok(config)
    }
}

/// Listen address settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// The host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Let `TRIBUNE_HOST` / `TRIBUNE_PORT` override the YAML values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("TRIBUNE_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("TRIBUNE_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
        {
            self.port = port;
        }
    }
}

/// One venue to create at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArenaConfig {
    /// The external live-video channel to bind to.
    pub channel: String,
    /// Display name shown in the lobby.
    pub name: String,
    /// Tiers (rows) per side.
    #[serde(default = "default_tiers")]
    pub tiers: u32,
    /// Seats per tier.
    #[serde(default = "default_seats_per_tier")]
    pub seats_per_tier: u32,
}

/// Emote asset-set settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EmoteConfig {
    /// Number of emote assets; valid kinds are `0..kinds`.
    #[serde(default = "default_emote_kinds")]
    pub kinds: u8,
}

impl Default for EmoteConfig {
    fn default() -> Self {
        Self {
            kinds: default_emote_kinds(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

const fn default_tiers() -> u32 {
    8
}

const fn default_seats_per_tier() -> u32 {
    5
}

const fn default_emote_kinds() -> u8 {
    8
}

/// The stock venues the server ships with.
fn default_arenas() -> Vec<ArenaConfig> {
    vec![
        ArenaConfig {
            channel: String::from("otplol_"),
            name: String::from("OTP"),
            tiers: default_tiers(),
            seats_per_tier: default_seats_per_tier(),
        },
        ArenaConfig {
            channel: String::from("claudeplayspokemon"),
            name: String::from("CPP"),
            tiers: default_tiers(),
            seats_per_tier: default_seats_per_tier(),
        },
    ]
}
