//! In-process topic exchange.
//!
//! Routes like an AMQP topic exchange: every queue bound to the exchange with
//! a matching pattern gets one copy, and a message nothing matches is dropped.
//! Used for single-node deployments and by the pipeline tests.

use super::channel::{AckMode, ChannelError, MessageChannel};
use super::topic::topic_matches;
use crate::events::{
    inbound_message_channel, InboundMessage, InboundReceiver, InboundSender, MessageAcker,
};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct Binding {
    exchange: String,
    queue: String,
    pattern: String,
}

#[derive(Debug)]
struct QueueState {
    sender: InboundSender,
    ack_mode: AckMode,
    acked: Arc<AtomicU64>,
}

#[derive(Debug, Default)]
struct BrokerState {
    queues: HashMap<String, QueueState>,
    bindings: Vec<Binding>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBroker {
    state: Arc<RwLock<BrokerState>>,
}

struct CountingAcker {
    acked: Arc<AtomicU64>,
}

#[async_trait]
impl MessageAcker for CountingAcker {
    async fn ack(&self) -> Result<(), ChannelError> {
        self.acked.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a queue and return the receiving end of it.
    ///
    /// Declaring a queue again replaces it; the previous receiver sees the
    /// channel close.
    pub async fn declare_queue(&self, name: &str, ack_mode: AckMode) -> InboundReceiver {
        let (sender, receiver) = inbound_message_channel();
        let mut state = self.state.write().await;
        state.queues.insert(
            name.to_string(),
            QueueState {
                sender,
                ack_mode,
                acked: Arc::new(AtomicU64::new(0)),
            },
        );
        receiver
    }

    pub async fn bind(&self, queue: &str, exchange: &str, pattern: &str) -> Result<(), ChannelError> {
        let mut state = self.state.write().await;
        if !state.queues.contains_key(queue) {
            return Err(ChannelError::UnknownQueue(queue.to_string()));
        }
        state.bindings.push(Binding {
            exchange: exchange.to_string(),
            queue: queue.to_string(),
            pattern: pattern.to_string(),
        });
        Ok(())
    }

    /// Number of deliveries on `queue` that were acknowledged by the consumer.
    /// Always zero for auto-ack queues.
    pub async fn acknowledged(&self, queue: &str) -> u64 {
        let state = self.state.read().await;
        state
            .queues
            .get(queue)
            .map(|q| q.acked.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

#[async_trait]
impl MessageChannel for InMemoryBroker {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        body: Vec<u8>,
    ) -> Result<(), ChannelError> {
        let targets: Vec<(InboundSender, AckMode, Arc<AtomicU64>)> = {
            let state = self.state.read().await;
            let queues: BTreeSet<&str> = state
                .bindings
                .iter()
                .filter(|b| b.exchange == exchange && topic_matches(&b.pattern, routing_key))
                .map(|b| b.queue.as_str())
                .collect();
            queues
                .into_iter()
                .filter_map(|name| state.queues.get(name))
                .map(|q| (q.sender.clone(), q.ack_mode, q.acked.clone()))
                .collect()
        };

        if targets.is_empty() {
            debug!(exchange, routing_key, "no binding matched, message dropped");
            return Ok(());
        }

        for (sender, ack_mode, acked) in targets {
            let message = match ack_mode {
                AckMode::Auto => InboundMessage::auto_acked(routing_key, body.clone()),
                AckMode::Manual => InboundMessage::with_acker(
                    routing_key,
                    body.clone(),
                    Box::new(CountingAcker { acked }),
                ),
            };
            sender.send(message).await.map_err(|_| ChannelError::Closed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_routes_to_matching_queue() {
        let broker = InMemoryBroker::new();
        let mut rx = broker.declare_queue("overall", AckMode::Auto).await;
        broker.bind("overall", "rachao", "card.#").await.unwrap();

        broker
            .publish("rachao", "card.p1", b"{}".to_vec())
            .await
            .unwrap();

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.routing_key, "card.p1");
        assert_eq!(msg.body, b"{}");
        assert!(!msg.requires_ack());
    }

    #[tokio::test]
    async fn test_unroutable_message_is_dropped() {
        let broker = InMemoryBroker::new();
        let mut rx = broker.declare_queue("overall", AckMode::Auto).await;
        broker.bind("overall", "rachao", "card.#").await.unwrap();

        broker.publish("rachao", "photo.p1", vec![1]).await.unwrap();
        broker.publish("other", "card.p1", vec![2]).await.unwrap();

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_overlapping_bindings_deliver_once() {
        let broker = InMemoryBroker::new();
        let mut rx = broker.declare_queue("overall", AckMode::Auto).await;
        broker.bind("overall", "rachao", "card.#").await.unwrap();
        broker.bind("overall", "rachao", "card.*").await.unwrap();

        broker.publish("rachao", "card.p1", vec![7]).await.unwrap();

        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_fan_out_to_every_bound_queue() {
        let broker = InMemoryBroker::new();
        let mut a = broker.declare_queue("a", AckMode::Auto).await;
        let mut b = broker.declare_queue("b", AckMode::Auto).await;
        broker.bind("a", "rachao", "card.#").await.unwrap();
        broker.bind("b", "rachao", "#").await.unwrap();

        broker.publish("rachao", "card.p1", vec![1]).await.unwrap();

        assert!(a.recv().await.is_some());
        assert!(b.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_bind_unknown_queue_fails() {
        let broker = InMemoryBroker::new();
        let err = broker.bind("missing", "rachao", "#").await.unwrap_err();
        assert!(matches!(err, ChannelError::UnknownQueue(q) if q == "missing"));
    }

    #[tokio::test]
    async fn test_publish_to_dropped_receiver_is_closed() {
        let broker = InMemoryBroker::new();
        let rx = broker.declare_queue("overall", AckMode::Auto).await;
        broker.bind("overall", "rachao", "card.#").await.unwrap();
        drop(rx);

        let err = broker
            .publish("rachao", "card.p1", vec![1])
            .await
            .unwrap_err();
        assert!(matches!(err, ChannelError::Closed));
    }

    #[tokio::test]
    async fn test_manual_ack_is_counted() {
        let broker = InMemoryBroker::new();
        let mut rx = broker.declare_queue("overall", AckMode::Manual).await;
        broker.bind("overall", "rachao", "card.#").await.unwrap();

        broker.publish("rachao", "card.p1", vec![1]).await.unwrap();
        let mut msg = rx.recv().await.unwrap();
        assert!(msg.requires_ack());
        assert_eq!(broker.acknowledged("overall").await, 0);

        msg.ack().await.unwrap();
        assert_eq!(broker.acknowledged("overall").await, 1);
        // A second ack on the same message is a no-op.
        msg.ack().await.unwrap();
        assert_eq!(broker.acknowledged("overall").await, 1);
    }
}
