//! # rf-config
//!
//! Layered configuration for Rusty-Fund. Later sources win:
//! - built-in defaults
//! - `config/rusty-fund.{toml,yaml,json}` (optional)
//! - environment variables prefixed with `RUSTY_FUND__`
//!   (e.g., `RUSTY_FUND__SERVER__PORT=9000`)
//!
//! A `.env` file, if present, is loaded into the environment first.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL (e.g., "sqlite:rusty_fund.db")
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. "info" or "rf_api=debug,info"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_database_url() -> String { "sqlite:rusty_fund.db".to_string() }
fn default_max_connections() -> u32 { 5 }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: default_database_url(), max_connections: default_max_connections() }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

impl AppConfig {
    /// Load configuration from `.env`, the optional config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("config/rusty-fund").required(false))
                .add_source(
                    Environment::with_prefix("RUSTY_FUND")
                        .prefix_separator("__")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    /// Deserialize from an arbitrary set of sources; missing keys take defaults.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// "host:port" for `HttpServer::bind`.
    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults_without_sources() {
        let config = AppConfig::from_builder(Config::builder()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.url, "sqlite:rusty_fund.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.log.level, "info");
        assert!(!config.log.json);
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() {
        let toml = r#"
            [server]
            port = 9000

            [log]
            json = true
        "#;
        let config = AppConfig::from_builder(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
        .unwrap();

        assert_eq!(config.bind_address(), ("127.0.0.1".to_string(), 9000));
        assert!(config.log.json);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.database.url, "sqlite:rusty_fund.db");
    }

    #[test]
    fn test_override_wins_over_file() {
        let config = AppConfig::from_builder(
            Config::builder()
                .add_source(File::from_str("[database]\nurl = \"sqlite:a.db\"", FileFormat::Toml))
                .set_override("database.url", "sqlite::memory:")
                .unwrap(),
        )
        .unwrap();

        assert_eq!(config.database.url, "sqlite::memory:");
    }
}
