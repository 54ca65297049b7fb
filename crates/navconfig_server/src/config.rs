//! Layered server settings.
//!
//! Sources, lowest precedence first: built-in defaults, optional
//! `config/settings.toml`, then `NAVCONFIG_*` environment variables with `__`
//! between nested keys (`NAVCONFIG_SERVER__PORT=9000`).

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use navconfig_core::default_log_level;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const CONFIG_FILE: &str = "config/settings";
const ENV_PREFIX: &str = "NAVCONFIG";

/// Database path that selects a private in-memory database.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Relative paths resolve against the working directory.
    pub dir: Option<PathBuf>,
}

impl Settings {
    /// Loads `.env`, the optional settings file and the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to assemble configuration sources")?;

        config
            .try_deserialize()
            .context("failed to deserialize settings")
    }

    /// Builder pre-populated with every default value.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("database.path", "navconfig.sqlite3")?
            .set_default("logging.level", default_log_level())
    }

    /// `host:port` string for the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Absolute log directory; defaults to `<cwd>/logs`.
    pub fn log_dir(&self) -> Result<PathBuf> {
        let configured = self
            .logging
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("logs"));
        if configured.is_absolute() {
            return Ok(configured);
        }
        let cwd = std::env::current_dir().context("failed to resolve working directory")?;
        Ok(cwd.join(configured))
    }
}
