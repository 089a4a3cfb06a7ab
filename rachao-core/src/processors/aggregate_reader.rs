//! Read side of the overall pipeline.
//!
//! Given a card id, resolve the card, the player that owns it and the
//! attribute set of that player's position. Every call reads the store of
//! record; nothing is cached.

use crate::entities::attributes::GetAttributesByPosition;
use crate::entities::card::{GetCardById, ListCardIdsByPosition};
use crate::entities::player::GetPlayerById;
use crate::framework::DatabaseProcessor;
use async_trait::async_trait;
use kanau::processor::Processor;
use rachao_sdk::objects::{Attributes, Card, Player};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("card {0} not found")]
    CardNotFound(Uuid),
    #[error("player {0} not found")]
    PlayerNotFound(Uuid),
    #[error("no attributes configured for position {0}")]
    AttributesNotFound(i32),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        !matches!(self, ResolveError::Database(_))
    }
}

/// Lookups the aggregate reader depends on. An absent row is `Ok(None)`.
#[async_trait]
pub trait CardAggregateSource: Send + Sync {
    async fn get_card(&self, id: Uuid) -> Result<Option<Card>, sqlx::Error>;
    async fn get_player(&self, id: Uuid) -> Result<Option<Player>, sqlx::Error>;
    async fn get_attributes_by_position(
        &self,
        id_position: i32,
    ) -> Result<Option<Attributes>, sqlx::Error>;
    /// Ids of every card whose player plays `id_position`.
    async fn list_card_ids_by_position(&self, id_position: i32) -> Result<Vec<Uuid>, sqlx::Error>;
}

#[async_trait]
impl CardAggregateSource for DatabaseProcessor {
    async fn get_card(&self, id: Uuid) -> Result<Option<Card>, sqlx::Error> {
        Ok(self.process(GetCardById { id }).await?.map(Card::from))
    }

    async fn get_player(&self, id: Uuid) -> Result<Option<Player>, sqlx::Error> {
        Ok(self.process(GetPlayerById { id }).await?.map(Player::from))
    }

    async fn get_attributes_by_position(
        &self,
        id_position: i32,
    ) -> Result<Option<Attributes>, sqlx::Error> {
        Ok(self
            .process(GetAttributesByPosition { id_position })
            .await?
            .map(Attributes::from))
    }

    async fn list_card_ids_by_position(&self, id_position: i32) -> Result<Vec<Uuid>, sqlx::Error> {
        self.process(ListCardIdsByPosition { id_position }).await
    }
}

#[derive(Clone)]
pub struct AggregateReader {
    source: Arc<dyn CardAggregateSource>,
}

impl AggregateReader {
    pub fn new(source: Arc<dyn CardAggregateSource>) -> Self {
        Self { source }
    }

    /// Resolve a card and the weights that apply to it.
    pub async fn resolve(&self, card_id: Uuid) -> Result<(Card, Attributes), ResolveError> {
        let card = self
            .source
            .get_card(card_id)
            .await?
            .ok_or(ResolveError::CardNotFound(card_id))?;
        let player = self
            .source
            .get_player(card.id_play)
            .await?
            .ok_or(ResolveError::PlayerNotFound(card.id_play))?;
        let attributes = self
            .source
            .get_attributes_by_position(player.id_position)
            .await?
            .ok_or(ResolveError::AttributesNotFound(player.id_position))?;
        Ok((card, attributes))
    }

    pub async fn card_ids_for_position(&self, id_position: i32) -> Result<Vec<Uuid>, ResolveError> {
        Ok(self.source.list_card_ids_by_position(id_position).await?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory `CardAggregateSource` for pipeline tests.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub cards: Mutex<HashMap<Uuid, Card>>,
        pub players: Mutex<HashMap<Uuid, Player>>,
        pub attributes: Mutex<HashMap<i32, Attributes>>,
        pub fail: AtomicBool,
    }

    impl FakeSource {
        pub(crate) fn add_position(&self, id_position: i32, weights: [i32; 6]) {
            let [pac, sho, pas, dri, def, phy] = weights;
            self.attributes.lock().unwrap().insert(
                id_position,
                Attributes {
                    id: id_position * 10,
                    id_position,
                    pac,
                    sho,
                    pas,
                    dri,
                    def,
                    phy,
                },
            );
        }

        pub(crate) fn add_player(&self, id_position: i32) -> Uuid {
            let id = Uuid::new_v4();
            self.players.lock().unwrap().insert(
                id,
                Player {
                    id,
                    name: format!("player-{id}"),
                    id_position,
                    id_nation: 1,
                    field: true,
                    active: true,
                },
            );
            id
        }

        pub(crate) fn set_card(&self, id_play: Uuid, scores: [i32; 6]) -> Uuid {
            let mut cards = self.cards.lock().unwrap();
            let id = cards
                .values()
                .find(|c| c.id_play == id_play)
                .map(|c| c.id)
                .unwrap_or_else(Uuid::new_v4);
            let [pac, sho, pas, dri, def, phy] = scores;
            cards.insert(
                id,
                Card {
                    id,
                    id_play,
                    pac,
                    sho,
                    pas,
                    dri,
                    def,
                    phy,
                },
            );
            id
        }

        fn check(&self) -> Result<(), sqlx::Error> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(sqlx::Error::PoolTimedOut);
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CardAggregateSource for FakeSource {
        async fn get_card(&self, id: Uuid) -> Result<Option<Card>, sqlx::Error> {
            self.check()?;
            Ok(self.cards.lock().unwrap().get(&id).copied())
        }

        async fn get_player(&self, id: Uuid) -> Result<Option<Player>, sqlx::Error> {
            self.check()?;
            Ok(self.players.lock().unwrap().get(&id).cloned())
        }

        async fn get_attributes_by_position(
            &self,
            id_position: i32,
        ) -> Result<Option<Attributes>, sqlx::Error> {
            self.check()?;
            Ok(self.attributes.lock().unwrap().get(&id_position).copied())
        }

        async fn list_card_ids_by_position(
            &self,
            id_position: i32,
        ) -> Result<Vec<Uuid>, sqlx::Error> {
            self.check()?;
            let players = self.players.lock().unwrap();
            let mut ids: Vec<Uuid> = self
                .cards
                .lock()
                .unwrap()
                .values()
                .filter(|c| {
                    players
                        .get(&c.id_play)
                        .is_some_and(|p| p.id_position == id_position)
                })
                .map(|c| c.id)
                .collect();
            ids.sort();
            Ok(ids)
        }
    }

    #[tokio::test]
    async fn test_resolve_card_and_position_weights() {
        let source = Arc::new(FakeSource::default());
        source.add_position(9, [2, 3, 1, 2, 0, 1]);
        let id_play = source.add_player(9);
        let card_id = source.set_card(id_play, [80, 70, 60, 75, 40, 65]);

        let reader = AggregateReader::new(source);
        let (card, attributes) = reader.resolve(card_id).await.unwrap();
        assert_eq!(card.id, card_id);
        assert_eq!(card.id_play, id_play);
        assert_eq!(attributes.id_position, 9);
        assert_eq!(attributes.weights(), [2, 3, 1, 2, 0, 1]);
    }

    #[tokio::test]
    async fn test_resolve_missing_card() {
        let reader = AggregateReader::new(Arc::new(FakeSource::default()));
        let card_id = Uuid::new_v4();
        let err = reader.resolve(card_id).await.unwrap_err();
        assert!(matches!(err, ResolveError::CardNotFound(id) if id == card_id));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_resolve_missing_player() {
        let source = Arc::new(FakeSource::default());
        let orphan = Uuid::new_v4();
        let card_id = source.set_card(orphan, [50; 6]);

        let err = AggregateReader::new(source).resolve(card_id).await.unwrap_err();
        assert!(matches!(err, ResolveError::PlayerNotFound(id) if id == orphan));
    }

    #[tokio::test]
    async fn test_resolve_position_without_attributes() {
        let source = Arc::new(FakeSource::default());
        let id_play = source.add_player(4);
        let card_id = source.set_card(id_play, [50; 6]);

        let err = AggregateReader::new(source).resolve(card_id).await.unwrap_err();
        assert!(matches!(err, ResolveError::AttributesNotFound(4)));
    }

    #[tokio::test]
    async fn test_resolve_store_error() {
        let source = Arc::new(FakeSource::default());
        source.fail.store(true, Ordering::SeqCst);

        let err = AggregateReader::new(source)
            .resolve(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Database(_)));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_resolve_reads_fresh_state() {
        let source = Arc::new(FakeSource::default());
        source.add_position(1, [1; 6]);
        let id_play = source.add_player(1);
        let card_id = source.set_card(id_play, [10; 6]);
        let reader = AggregateReader::new(source.clone());

        assert_eq!(reader.resolve(card_id).await.unwrap().0.pac, 10);
        source.set_card(id_play, [20; 6]);
        assert_eq!(reader.resolve(card_id).await.unwrap().0.pac, 20);
    }
}
