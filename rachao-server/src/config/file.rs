//! TOML file configuration structures.
//!
//! These structs directly map to the `rachao-config.toml` file format. Every
//! field has a default, so an empty file is a valid configuration.

use rachao_core::config::BrokerKind;
use rachao_core::messaging::AckMode;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub messaging: MessagingConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

/// Database pool section. The URL itself comes from `DATABASE_URL`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

/// Overall pipeline messaging section. The broker URL comes from `AMQP_URL`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    #[serde(default)]
    pub broker: BrokerKind,
    #[serde(default = "default_exchange")]
    pub exchange: String,
    #[serde(default = "default_queue")]
    pub queue: String,
    #[serde(default = "default_binding_key")]
    pub binding_key: String,
    #[serde(default)]
    pub ack_mode: AckMode,
    #[serde(default = "default_consumer_tag")]
    pub consumer_tag: String,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            broker: BrokerKind::default(),
            exchange: default_exchange(),
            queue: default_queue(),
            binding_key: default_binding_key(),
            ack_mode: AckMode::default(),
            consumer_tag: default_consumer_tag(),
        }
    }
}

fn default_exchange() -> String {
    "rachao".to_string()
}

fn default_queue() -> String {
    "overall".to_string()
}

fn default_binding_key() -> String {
    "card.#".to_string()
}

fn default_consumer_tag() -> String {
    "rachao-overall".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[database]
max_connections = 4

[messaging]
broker = "memory"
exchange = "cards"
queue = "ratings"
binding_key = "card.*"
ack_mode = "manual"
consumer_tag = "worker-1"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.messaging.broker, BrokerKind::Memory);
        assert_eq!(config.messaging.exchange, "cards");
        assert_eq!(config.messaging.queue, "ratings");
        assert_eq!(config.messaging.binding_key, "card.*");
        assert_eq!(config.messaging.ack_mode, AckMode::Manual);
        assert_eq!(config.messaging.consumer_tag, "worker-1");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.listen, default_listen_addr());
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.messaging.broker, BrokerKind::Amqp);
        assert_eq!(config.messaging.exchange, "rachao");
        assert_eq!(config.messaging.queue, "overall");
        assert_eq!(config.messaging.binding_key, "card.#");
        assert_eq!(config.messaging.ack_mode, AckMode::Auto);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: FileConfig = toml::from_str("[messaging]\nack_mode = \"manual\"\n").unwrap();
        assert_eq!(config.messaging.ack_mode, AckMode::Manual);
        assert_eq!(config.messaging.exchange, "rachao");
    }

    #[test]
    fn test_unknown_broker_is_rejected() {
        assert!(toml::from_str::<FileConfig>("[messaging]\nbroker = \"kafka\"\n").is_err());
        assert!(toml::from_str::<FileConfig>("[messaging]\nack_mode = \"sometimes\"\n").is_err());
    }
}
