//! Configuration management for the outline server
//!
//! All settings carry sensible defaults and can be overridden by a TOML
//! file, `OUTLINE_*` environment variables, and CLI flags (in that
//! order of precedence, lowest first).

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default config file looked up when no `--config` flag is given.
pub const DEFAULT_CONFIG_FILE: &str = "outline-server.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Outline store configuration
    pub outline: OutlineConfig,

    /// Static asset configuration
    pub assets: AssetConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub http_addr: SocketAddr,
}

/// Outline store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Text assigned to the root node at startup
    pub root_text: String,

    /// How long change-log entries are kept before the lazy sweep
    /// discards them (seconds)
    pub retention_secs: u64,
}

/// Static asset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding ui.html, style.css, main.js and favicon.ico
    pub dir: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            outline: OutlineConfig::default(),
            assets: AssetConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:5001".parse().unwrap(),
        }
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            root_text: "My Outline".to_string(),
            retention_secs: 3600,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./assets"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file and environment
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        // Try to load from config file first
        if let Ok(file_config) = Self::from_file(DEFAULT_CONFIG_FILE) {
            config = file_config;
        }

        // Override with environment variables
        config.apply_env_overrides()?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        use std::env;

        if let Ok(addr) = env::var("OUTLINE_HTTP_ADDR") {
            self.server.http_addr = addr
                .parse()
                .map_err(|e| Error::config(format!("Invalid HTTP address: {}", e)))?;
        }

        if let Ok(text) = env::var("OUTLINE_ROOT_TEXT") {
            self.outline.root_text = text;
        }

        if let Ok(secs) = env::var("OUTLINE_RETENTION_SECS") {
            self.outline.retention_secs = secs
                .parse()
                .map_err(|e| Error::config(format!("Invalid retention: {}", e)))?;
        }

        if let Ok(dir) = env::var("OUTLINE_ASSETS_DIR") {
            self.assets.dir = PathBuf::from(dir);
        }

        if let Ok(level) = env::var("OUTLINE_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.outline.retention_secs == 0 {
            return Err(Error::config("Retention must be at least one second"));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(Error::config("Invalid log level")),
        }

        Ok(())
    }

    /// Change-log retention as a `Duration`
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.outline.retention_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.http_addr.port(), 5001);
        assert_eq!(config.outline.root_text, "My Outline");
        assert_eq!(config.retention(), Duration::from_secs(3600));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [outline]
            root_text = "Team Notes"
            "#,
        )
        .unwrap();

        assert_eq!(config.outline.root_text, "Team Notes");
        assert_eq!(config.outline.retention_secs, 3600);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn rejects_zero_retention() {
        let mut config = Config::default();
        config.outline.retention_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }
}
