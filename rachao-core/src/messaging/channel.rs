use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel closed")]
    Closed,
    #[error("queue {0} is not declared")]
    UnknownQueue(String),
    #[error("broker refused the message")]
    Nacked,
    #[error("amqp error: {0}")]
    Amqp(#[from] lapin::Error),
}

/// How deliveries on the overall queue are acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckMode {
    /// Acked on delivery. A consumer crash mid-message loses that message.
    #[default]
    Auto,
    /// Acked after the consumer handled the message, so the broker redelivers
    /// anything in flight when the consumer dies.
    Manual,
}

impl AckMode {
    pub fn is_auto(self) -> bool {
        matches!(self, AckMode::Auto)
    }
}

/// Publishing side of a topic exchange.
///
/// `publish` returns once the broker accepted the message for routing. It never
/// waits for a consumer.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        body: Vec<u8>,
    ) -> Result<(), ChannelError>;
}
