//! Configuration module for rachao-server.
//!
//! Handles loading configuration from the TOML file, CLI arguments and
//! environment variables.

pub mod file;

use crate::config::file::FileConfig;
use rachao_core::config::MessagingConfig;
use rachao_core::messaging::is_valid_pattern;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,

    #[error("AMQP_URL environment variable not set")]
    MissingAmqpUrl,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub max_connections: u32,
    pub messaging: MessagingConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load the configuration file. A missing file means all defaults.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.config_path.display(),
                    "Config file not found, using defaults"
                );
                String::new()
            }
            Err(e) => return Err(e.into()),
        };
        self.load_str(&config_content)
    }

    /// Parse, apply CLI overrides and validate.
    pub fn load_str(&self, config_content: &str) -> Result<LoadedConfig, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        validate(&file_config)?;

        let m = file_config.messaging;
        Ok(LoadedConfig {
            listen: file_config.server.listen,
            max_connections: file_config.database.max_connections,
            messaging: MessagingConfig {
                broker: m.broker,
                exchange: m.exchange,
                queue: m.queue,
                binding_key: m.binding_key,
                ack_mode: m.ack_mode,
                consumer_tag: m.consumer_tag,
            },
        })
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if config.database.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "database.max_connections must be at least 1".to_string(),
        ));
    }
    let m = &config.messaging;
    for (name, value) in [
        ("exchange", &m.exchange),
        ("queue", &m.queue),
        ("consumer_tag", &m.consumer_tag),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "messaging.{name} must not be empty"
            )));
        }
    }
    if !is_valid_pattern(&m.binding_key) {
        return Err(ConfigError::ValidationError(format!(
            "messaging.binding_key {:?} is not a valid topic pattern",
            m.binding_key
        )));
    }
    Ok(())
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}

/// Get the AMQP broker URL from the environment.
pub fn get_amqp_url() -> Result<String, ConfigError> {
    std::env::var("AMQP_URL").map_err(|_| ConfigError::MissingAmqpUrl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rachao_core::config::BrokerKind;

    fn loader(listen: Option<SocketAddr>) -> ConfigLoader {
        ConfigLoader::new("/nonexistent/rachao-config.toml", listen)
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let loaded = loader(None).load().unwrap();
        assert_eq!(loaded.listen.port(), 8080);
        assert_eq!(loaded.max_connections, 10);
        assert_eq!(loaded.messaging.broker, BrokerKind::Amqp);
        assert_eq!(loaded.messaging.binding_key, "card.#");
    }

    #[test]
    fn test_listen_override_wins() {
        let addr: SocketAddr = "127.0.0.1:9999".parse().unwrap();
        let loaded = loader(Some(addr))
            .load_str("[server]\nlisten = \"0.0.0.0:1234\"\n")
            .unwrap();
        assert_eq!(loaded.listen, addr);
    }

    #[test]
    fn test_rejects_empty_names() {
        let err = loader(None)
            .load_str("[messaging]\nqueue = \"  \"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("queue")));
    }

    #[test]
    fn test_rejects_invalid_binding_key() {
        let err = loader(None)
            .load_str("[messaging]\nbinding_key = \"card.#x\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("binding_key")));
    }

    #[test]
    fn test_rejects_zero_pool_size() {
        let err = loader(None)
            .load_str("[database]\nmax_connections = 0\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = loader(None).load_str("[server\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
