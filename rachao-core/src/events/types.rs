//! Messages delivered to the overall consumer.

use crate::messaging::ChannelError;
use async_trait::async_trait;
use std::fmt;

/// Settles one delivery with the broker.
///
/// Only handed out when the queue is consumed in manual-ack mode; auto-ack
/// deliveries carry no acker at all.
#[async_trait]
pub trait MessageAcker: Send + Sync {
    async fn ack(&self) -> Result<(), ChannelError>;
}

/// A message drained from the overall queue.
pub struct InboundMessage {
    pub routing_key: String,
    pub body: Vec<u8>,
    acker: Option<Box<dyn MessageAcker>>,
}

impl InboundMessage {
    /// A message that was already acknowledged on delivery.
    pub fn auto_acked(routing_key: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            routing_key: routing_key.into(),
            body,
            acker: None,
        }
    }

    /// A message the consumer must acknowledge once it is done with it.
    pub fn with_acker(
        routing_key: impl Into<String>,
        body: Vec<u8>,
        acker: Box<dyn MessageAcker>,
    ) -> Self {
        Self {
            routing_key: routing_key.into(),
            body,
            acker: Some(acker),
        }
    }

    pub fn requires_ack(&self) -> bool {
        self.acker.is_some()
    }

    /// Acknowledge the delivery. A no-op for auto-acked messages.
    pub async fn ack(&mut self) -> Result<(), ChannelError> {
        match self.acker.take() {
            Some(acker) => acker.ack().await,
            None => Ok(()),
        }
    }
}

impl fmt::Debug for InboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundMessage")
            .field("routing_key", &self.routing_key)
            .field("body_len", &self.body.len())
            .field("requires_ack", &self.requires_ack())
            .finish()
    }
}
