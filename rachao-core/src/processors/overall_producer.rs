//! Publishes overall payloads after card and attribute writes.
//!
//! Runs on the request path: a publish failure is reported to the caller even
//! though the write that triggered it has already committed.

use super::aggregate_reader::{AggregateReader, ResolveError};
use crate::messaging::{ChannelError, MessageChannel};
use rachao_sdk::objects::OverallPayload;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("failed to encode payload: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to publish payload: {0}")]
    Channel(#[from] ChannelError),
}

#[derive(Clone)]
pub struct OverallProducer {
    reader: AggregateReader,
    channel: Arc<dyn MessageChannel>,
    exchange: String,
}

impl OverallProducer {
    pub fn new(
        reader: AggregateReader,
        channel: Arc<dyn MessageChannel>,
        exchange: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            channel,
            exchange: exchange.into(),
        }
    }

    /// Publish the overall payload of one card under `card.<id_play>`.
    ///
    /// Every call enqueues a new message; nothing is deduplicated.
    pub async fn publish(&self, card_id: Uuid) -> Result<(), PublishError> {
        let (card, attributes) = self.reader.resolve(card_id).await?;
        let payload = OverallPayload { card, attributes };
        let body = serde_json::to_vec(&payload)?;
        let routing_key = payload.routing_key();

        self.channel
            .publish(&self.exchange, &routing_key, body)
            .await?;

        info!(
            card_id = %card_id,
            player_id = %payload.player_id(),
            routing_key = %routing_key,
            "Overall payload published"
        );
        Ok(())
    }

    /// Republish every card whose player plays `id_position`. Stops at the
    /// first failure. Returns how many payloads were published.
    pub async fn publish_for_position(&self, id_position: i32) -> Result<usize, PublishError> {
        let card_ids = self.reader.card_ids_for_position(id_position).await?;
        for card_id in &card_ids {
            self.publish(*card_id).await?;
        }
        info!(
            id_position,
            published = card_ids.len(),
            "Overall payloads republished for position"
        );
        Ok(card_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::InboundReceiver;
    use crate::messaging::{AckMode, InMemoryBroker};
    use crate::processors::aggregate_reader::tests::FakeSource;
    use rachao_sdk::objects::routing_key_for_player;

    async fn setup() -> (Arc<FakeSource>, OverallProducer, InboundReceiver) {
        let source = Arc::new(FakeSource::default());
        let broker = InMemoryBroker::new();
        let rx = broker.declare_queue("overall", AckMode::Auto).await;
        broker.bind("overall", "rachao", "card.#").await.unwrap();
        let producer = OverallProducer::new(
            AggregateReader::new(source.clone()),
            Arc::new(broker),
            "rachao",
        );
        (source, producer, rx)
    }

    #[tokio::test]
    async fn test_publish_emits_card_and_attributes() {
        let (source, producer, mut rx) = setup().await;
        source.add_position(9, [2, 3, 1, 2, 0, 1]);
        let id_play = source.add_player(9);
        let card_id = source.set_card(id_play, [80, 70, 60, 75, 40, 65]);

        producer.publish(card_id).await.unwrap();

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.routing_key, routing_key_for_player(id_play));
        let payload: OverallPayload = serde_json::from_slice(&msg.body).unwrap();
        assert_eq!(payload.card.id, card_id);
        assert_eq!(payload.card.scores(), [80, 70, 60, 75, 40, 65]);
        assert_eq!(payload.attributes.id_position, 9);
    }

    #[tokio::test]
    async fn test_routing_key_is_stable_across_publishes() {
        let (source, producer, mut rx) = setup().await;
        source.add_position(1, [1; 6]);
        let id_play = source.add_player(1);
        let card_id = source.set_card(id_play, [50; 6]);

        producer.publish(card_id).await.unwrap();
        source.set_card(id_play, [60; 6]);
        producer.publish(card_id).await.unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.routing_key, format!("card.{id_play}"));
        assert_eq!(first.routing_key, second.routing_key);
        assert_ne!(first.body, second.body);
    }

    #[tokio::test]
    async fn test_not_found_is_propagated_and_nothing_published() {
        let (source, producer, mut rx) = setup().await;
        let id_play = source.add_player(3);
        let card_id = source.set_card(id_play, [50; 6]);

        let err = producer.publish(card_id).await.unwrap_err();
        assert!(matches!(
            err,
            PublishError::Resolve(ResolveError::AttributesNotFound(3))
        ));

        let err = producer.publish(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(
            err,
            PublishError::Resolve(ResolveError::CardNotFound(_))
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_channel_fails_publish() {
        let (source, producer, rx) = setup().await;
        source.add_position(1, [1; 6]);
        let id_play = source.add_player(1);
        let card_id = source.set_card(id_play, [50; 6]);
        drop(rx);

        let err = producer.publish(card_id).await.unwrap_err();
        assert!(matches!(err, PublishError::Channel(ChannelError::Closed)));
    }

    #[tokio::test]
    async fn test_publish_for_position_covers_its_cards_only() {
        let (source, producer, mut rx) = setup().await;
        source.add_position(1, [1; 6]);
        source.add_position(2, [1; 6]);
        let a = source.add_player(1);
        let b = source.add_player(1);
        let c = source.add_player(2);
        source.set_card(a, [10; 6]);
        source.set_card(b, [20; 6]);
        source.set_card(c, [30; 6]);

        let published = producer.publish_for_position(1).await.unwrap();
        assert_eq!(published, 2);

        let mut keys = vec![
            rx.recv().await.unwrap().routing_key,
            rx.recv().await.unwrap().routing_key,
        ];
        keys.sort();
        let mut expected = vec![routing_key_for_player(a), routing_key_for_player(b)];
        expected.sort();
        assert_eq!(keys, expected);
        assert!(rx.try_recv().is_err());
    }
}
