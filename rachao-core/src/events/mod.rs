//! Inbound message types and the channel that carries them from a broker
//! subscription to the overall consumer.
//!
//! # Flow
//!
//! 1. A card write calls `OverallProducer::publish`, which publishes a payload
//!    on the exchange.
//! 2. The broker routes it to the bound queue; the subscription forwards each
//!    delivery as an `InboundMessage` into an `InboundSender`.
//! 3. `OverallConsumer` drains the `InboundReceiver` and upserts the overall.

pub mod channels;
pub mod types;

pub use channels::{inbound_message_channel, InboundReceiver, InboundSender, DEFAULT_CHANNEL_BUFFER};
pub use types::{InboundMessage, MessageAcker};
