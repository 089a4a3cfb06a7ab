//! Topic publish/subscribe transport between the overall producer and the
//! overall consumer.
//!
//! Two brokers implement [`MessageChannel`]: [`AmqpChannel`] talks to a real
//! AMQP 0-9-1 server, [`InMemoryBroker`] routes inside the process.

pub mod amqp;
pub mod channel;
pub mod memory;
pub mod topic;

pub use amqp::AmqpChannel;
pub use channel::{AckMode, ChannelError, MessageChannel};
pub use memory::InMemoryBroker;
pub use topic::{is_valid_pattern, topic_matches};
