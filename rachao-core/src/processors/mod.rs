//! The overall pipeline.
//!
//! - `AggregateReader`: resolves a card and its position weights
//! - `OverallProducer`: publishes `OverallPayload` after card writes
//! - `OverallConsumer`: drains the overall queue, upserts `Overall` records

pub mod aggregate_reader;
pub mod overall_consumer;
pub mod overall_producer;

pub use aggregate_reader::{AggregateReader, CardAggregateSource, ResolveError};
pub use overall_consumer::{Applied, ConsumeError, OverallConsumer, OverallStore};
pub use overall_producer::{OverallProducer, PublishError};
