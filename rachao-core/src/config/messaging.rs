use crate::messaging::AckMode;
use serde::{Deserialize, Serialize};

/// Which broker carries the overall pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokerKind {
    /// An AMQP 0-9-1 server reached through `AMQP_URL`.
    #[default]
    Amqp,
    /// In-process routing. Only valid for a single node.
    Memory,
}

/// Validated messaging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagingConfig {
    pub broker: BrokerKind,
    /// Topic exchange overall payloads are published to.
    pub exchange: String,
    /// Queue the overall consumer drains.
    pub queue: String,
    /// Pattern binding `queue` to `exchange`.
    pub binding_key: String,
    pub ack_mode: AckMode,
    pub consumer_tag: String,
}
