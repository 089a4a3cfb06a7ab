//! Channel between a broker subscription and the overall consumer.

use super::types::InboundMessage;
use tokio::sync::mpsc;

/// Default buffer size for inbound channels.
///
/// Bounded so a stalled consumer applies backpressure to the broker pump.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for inbound messages.
pub type InboundSender = mpsc::Sender<InboundMessage>;
/// Receiver handle for inbound messages.
pub type InboundReceiver = mpsc::Receiver<InboundMessage>;

/// Create a new inbound message channel.
pub fn inbound_message_channel() -> (InboundSender, InboundReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
