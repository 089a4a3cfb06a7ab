//! OverallConsumer processor.
//!
//! The OverallConsumer is responsible for:
//! - Draining the overall queue for the lifetime of the process
//! - Decoding each payload and deriving the player's rating
//! - Creating the player's overall record, or updating it in place
//!
//! A bad message or a failed store call is logged and dropped; only closure
//! of the inbound channel or the shutdown signal stops the loop.

use crate::entities::overall::{CreateOverall, OverallExists, UpdateOverall};
use crate::events::{InboundMessage, InboundReceiver};
use crate::framework::DatabaseProcessor;
use crate::utils::rating::overall_request;
use async_trait::async_trait;
use kanau::processor::Processor;
use rachao_sdk::objects::OverallPayload;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ConsumeError {
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Durable home of the one overall record per player.
#[async_trait]
pub trait OverallStore: Send + Sync {
    async fn exists(&self, id_play: Uuid) -> Result<bool, sqlx::Error>;
    /// Create the record and return its id.
    async fn create(&self, id_play: Uuid, overall: i32) -> Result<Uuid, sqlx::Error>;
    async fn update(&self, id_play: Uuid, overall: i32) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl OverallStore for DatabaseProcessor {
    async fn exists(&self, id_play: Uuid) -> Result<bool, sqlx::Error> {
        self.process(OverallExists { id_play }).await
    }

    async fn create(&self, id_play: Uuid, overall: i32) -> Result<Uuid, sqlx::Error> {
        self.process(CreateOverall { id_play, overall }).await
    }

    async fn update(&self, id_play: Uuid, overall: i32) -> Result<(), sqlx::Error> {
        let updated = self.process(UpdateOverall { id_play, overall }).await?;
        if !updated {
            // The row went away between the existence check and the update.
            self.process(CreateOverall { id_play, overall }).await?;
        }
        Ok(())
    }
}

/// What applying one payload did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Created(Uuid),
    Updated,
}

pub struct OverallConsumer {
    store: Arc<dyn OverallStore>,
}

impl OverallConsumer {
    pub fn new(store: Arc<dyn OverallStore>) -> Self {
        Self { store }
    }

    /// Start the consumer as a background task.
    pub fn spawn(
        self,
        shutdown_rx: watch::Receiver<bool>,
        inbound_rx: InboundReceiver,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown_rx, inbound_rx))
    }

    /// Run the OverallConsumer until shutdown or until the inbound channel
    /// closes.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>, mut inbound_rx: InboundReceiver) {
        info!("OverallConsumer started");

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("OverallConsumer received shutdown signal");
                        break;
                    }
                }

                received = inbound_rx.recv() => {
                    let Some(mut message) = received else {
                        info!("Overall inbound channel closed");
                        break;
                    };
                    debug!(
                        routing_key = %message.routing_key,
                        bytes = message.body.len(),
                        "Received overall payload"
                    );
                    self.handle_message(&message).await;
                    if let Err(e) = message.ack().await {
                        error!(
                            routing_key = %message.routing_key,
                            error = %e,
                            "Failed to acknowledge overall payload"
                        );
                    }
                }
            }
        }

        info!("OverallConsumer shutdown complete");
    }

    async fn handle_message(&self, message: &InboundMessage) {
        match self.apply(&message.body).await {
            Ok(Applied::Created(id)) => {
                info!(routing_key = %message.routing_key, overall_id = %id, "Overall created");
            }
            Ok(Applied::Updated) => {
                info!(routing_key = %message.routing_key, "Overall updated");
            }
            Err(ConsumeError::Decode(e)) => {
                warn!(
                    routing_key = %message.routing_key,
                    error = %e,
                    "Dropping malformed overall payload"
                );
            }
            Err(ConsumeError::Database(e)) => {
                error!(
                    routing_key = %message.routing_key,
                    error = %e,
                    "Failed to store overall"
                );
            }
        }
    }

    /// Decode one payload and upsert the player's overall.
    ///
    /// Keyed on the player only, so applying any sequence of payloads leaves
    /// the record holding the rating of the last one applied.
    pub async fn apply(&self, body: &[u8]) -> Result<Applied, ConsumeError> {
        let payload: OverallPayload = serde_json::from_slice(body)?;
        let request = overall_request(&payload);

        if self.store.exists(request.id_play).await? {
            self.store.update(request.id_play, request.overall).await?;
            Ok(Applied::Updated)
        } else {
            let id = self.store.create(request.id_play, request.overall).await?;
            Ok(Applied::Created(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{inbound_message_channel, MessageAcker};
    use crate::messaging::{AckMode, ChannelError, InMemoryBroker};
    use crate::processors::aggregate_reader::tests::FakeSource;
    use crate::processors::aggregate_reader::AggregateReader;
    use crate::processors::overall_producer::OverallProducer;
    use rachao_sdk::objects::{routing_key_for_player, Attributes, Card};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeStore {
        records: Mutex<HashMap<Uuid, (Uuid, i32)>>,
        creates: AtomicUsize,
        /// Number of upcoming store calls that fail.
        failures: AtomicUsize,
    }

    impl FakeStore {
        fn check(&self) -> Result<(), sqlx::Error> {
            let failing = self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(sqlx::Error::PoolTimedOut);
            }
            Ok(())
        }

        fn get(&self, id_play: Uuid) -> Option<(Uuid, i32)> {
            self.records.lock().unwrap().get(&id_play).copied()
        }

        fn len(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl OverallStore for FakeStore {
        async fn exists(&self, id_play: Uuid) -> Result<bool, sqlx::Error> {
            self.check()?;
            Ok(self.records.lock().unwrap().contains_key(&id_play))
        }

        async fn create(&self, id_play: Uuid, overall: i32) -> Result<Uuid, sqlx::Error> {
            self.check()?;
            self.creates.fetch_add(1, Ordering::SeqCst);
            let mut records = self.records.lock().unwrap();
            let entry = records.entry(id_play).or_insert((Uuid::new_v4(), overall));
            entry.1 = overall;
            Ok(entry.0)
        }

        async fn update(&self, id_play: Uuid, overall: i32) -> Result<(), sqlx::Error> {
            self.check()?;
            if let Some(entry) = self.records.lock().unwrap().get_mut(&id_play) {
                entry.1 = overall;
            }
            Ok(())
        }
    }

    struct CountingAcker(Arc<AtomicUsize>);

    #[async_trait]
    impl MessageAcker for CountingAcker {
        async fn ack(&self) -> Result<(), ChannelError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// A payload whose rating works out to `score`.
    fn payload(id_play: Uuid, score: i32) -> Vec<u8> {
        let payload = OverallPayload {
            card: Card {
                id: Uuid::new_v4(),
                id_play,
                pac: score,
                sho: score,
                pas: score,
                dri: score,
                def: score,
                phy: score,
            },
            attributes: Attributes {
                id: 1,
                id_position: 1,
                pac: 1,
                sho: 1,
                pas: 1,
                dri: 1,
                def: 1,
                phy: 1,
            },
        };
        serde_json::to_vec(&payload).unwrap()
    }

    fn message(id_play: Uuid, body: Vec<u8>) -> InboundMessage {
        InboundMessage::auto_acked(routing_key_for_player(id_play), body)
    }

    /// Feed `messages` to a consumer and run it until the channel closes.
    async fn drain(store: Arc<FakeStore>, messages: Vec<InboundMessage>) {
        let (tx, rx) = inbound_message_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        for m in messages {
            tx.send(m).await.unwrap();
        }
        drop(tx);
        tokio::time::timeout(
            Duration::from_secs(5),
            OverallConsumer::new(store).run(shutdown_rx, rx),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_converges_to_last_delivered_rating() {
        let store = Arc::new(FakeStore::default());
        let p = Uuid::new_v4();
        let ratings = [55, 91, 12, 70, 64];

        drain(
            store.clone(),
            ratings.iter().map(|r| message(p, payload(p, *r))).collect(),
        )
        .await;

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(p).unwrap().1, 64);
        assert_eq!(store.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_first_message_creates_then_updates_in_place() {
        let store = Arc::new(FakeStore::default());
        let consumer = OverallConsumer::new(store.clone());
        let p = Uuid::new_v4();

        let created = consumer.apply(&payload(p, 40)).await.unwrap();
        let Applied::Created(id) = created else {
            panic!("expected a create, got {created:?}");
        };
        assert_eq!(store.get(p), Some((id, 40)));

        assert_eq!(consumer.apply(&payload(p, 75)).await.unwrap(), Applied::Updated);
        assert_eq!(store.get(p), Some((id, 75)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_players_are_independent() {
        let store = Arc::new(FakeStore::default());
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        drain(
            store.clone(),
            vec![
                message(a, payload(a, 10)),
                message(b, payload(b, 20)),
                message(a, payload(a, 30)),
            ],
        )
        .await;

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(a).unwrap().1, 30);
        assert_eq!(store.get(b).unwrap().1, 20);
    }

    #[tokio::test]
    async fn test_malformed_message_does_not_block_the_loop() {
        let store = Arc::new(FakeStore::default());
        let p = Uuid::new_v4();

        drain(
            store.clone(),
            vec![
                message(p, b"not json".to_vec()),
                message(p, br#"{"card": {"id_play": "x"}}"#.to_vec()),
                message(p, payload(p, 88)),
            ],
        )
        .await;

        assert_eq!(store.get(p).unwrap().1, 88);
    }

    #[tokio::test]
    async fn test_decode_error_is_reported() {
        let consumer = OverallConsumer::new(Arc::new(FakeStore::default()));
        let err = consumer.apply(b"{}").await.unwrap_err();
        assert!(matches!(err, ConsumeError::Decode(_)));
    }

    #[tokio::test]
    async fn test_store_error_does_not_stop_the_loop() {
        let store = Arc::new(FakeStore::default());
        let p = Uuid::new_v4();
        let q = Uuid::new_v4();
        // Fails the existence check of the first message only.
        store.failures.store(1, Ordering::SeqCst);

        drain(
            store.clone(),
            vec![message(p, payload(p, 10)), message(q, payload(q, 20))],
        )
        .await;

        assert_eq!(store.get(p), None);
        assert_eq!(store.get(q).unwrap().1, 20);
    }

    #[tokio::test]
    async fn test_store_error_is_reported() {
        let store = Arc::new(FakeStore::default());
        store.failures.store(1, Ordering::SeqCst);
        let consumer = OverallConsumer::new(store);

        let err = consumer.apply(&payload(Uuid::new_v4(), 1)).await.unwrap_err();
        assert!(matches!(err, ConsumeError::Database(_)));
    }

    #[tokio::test]
    async fn test_manual_ack_after_every_message() {
        let store = Arc::new(FakeStore::default());
        let acked = Arc::new(AtomicUsize::new(0));
        let p = Uuid::new_v4();
        let manual = |body: Vec<u8>| {
            InboundMessage::with_acker(
                routing_key_for_player(p),
                body,
                Box::new(CountingAcker(acked.clone())),
            )
        };

        drain(
            store.clone(),
            vec![manual(payload(p, 10)), manual(b"garbage".to_vec()), manual(payload(p, 20))],
        )
        .await;

        assert_eq!(acked.load(Ordering::SeqCst), 3);
        assert_eq!(store.get(p).unwrap().1, 20);
    }

    #[tokio::test]
    async fn test_shutdown_signal_stops_the_loop() {
        let (_tx, rx) = inbound_message_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = OverallConsumer::new(Arc::new(FakeStore::default())).spawn(shutdown_rx, rx);

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_end_to_end_through_broker() {
        let source = Arc::new(FakeSource::default());
        source.add_position(7, [2, 3, 1, 2, 0, 1]);
        let id_play = source.add_player(7);
        let card_id = source.set_card(id_play, [80, 70, 60, 75, 40, 65]);

        let broker = Arc::new(InMemoryBroker::new());
        let rx = broker.declare_queue("overall", AckMode::Auto).await;
        broker.bind("overall", "rachao", "card.#").await.unwrap();
        let producer = OverallProducer::new(
            AggregateReader::new(source.clone()),
            broker.clone(),
            "rachao",
        );

        let store = Arc::new(FakeStore::default());
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = OverallConsumer::new(store.clone()).spawn(shutdown_rx, rx);

        producer.publish(card_id).await.unwrap();
        source.set_card(id_play, [90; 6]);
        producer.publish(card_id).await.unwrap();
        drop(producer);
        drop(broker);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id_play).unwrap().1, 90);
    }
}
