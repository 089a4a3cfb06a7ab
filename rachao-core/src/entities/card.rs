use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use rachao_sdk::objects::{Card, CardRequest};
use uuid::Uuid;

/// A row of the `card` table. `id_play` is unique: one card per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct CardRecord {
    pub id: Uuid,
    pub id_play: Uuid,
    pub pac: i32,
    pub sho: i32,
    pub pas: i32,
    pub dri: i32,
    pub def: i32,
    pub phy: i32,
}

impl From<CardRecord> for Card {
    fn from(r: CardRecord) -> Self {
        Card {
            id: r.id,
            id_play: r.id_play,
            pac: r.pac,
            sho: r.sho,
            pas: r.pas,
            dri: r.dri,
            def: r.def,
            phy: r.phy,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetCardById {
    pub id: Uuid,
}

impl Processor<GetCardById> for DatabaseProcessor {
    type Output = Option<CardRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCardById")]
    async fn process(&self, query: GetCardById) -> Result<Option<CardRecord>, sqlx::Error> {
        sqlx::query_as::<_, CardRecord>(
            r#"
            SELECT id, id_play, pac, sho, pas, dri, def, phy
            FROM card
            WHERE id = $1
            "#,
        )
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct GetCardByPlayer {
    pub id_play: Uuid,
}

impl Processor<GetCardByPlayer> for DatabaseProcessor {
    type Output = Option<CardRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCardByPlayer")]
    async fn process(&self, query: GetCardByPlayer) -> Result<Option<CardRecord>, sqlx::Error> {
        sqlx::query_as::<_, CardRecord>(
            r#"
            SELECT id, id_play, pac, sho, pas, dri, def, phy
            FROM card
            WHERE id_play = $1
            "#,
        )
        .bind(query.id_play)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Insert the card of a player.
///
/// Relies on the unique `id_play` constraint: returns `None` when the player
/// already has a card, instead of racing a separate existence check.
pub struct CreateCard {
    pub id_play: Uuid,
    pub scores: CardRequest,
}

impl Processor<CreateCard> for DatabaseProcessor {
    type Output = Option<Uuid>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateCard")]
    async fn process(&self, insert: CreateCard) -> Result<Option<Uuid>, sqlx::Error> {
        let s = insert.scores;
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO card (id_play, pac, sho, pas, dri, def, phy)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id_play) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(insert.id_play)
        .bind(s.pac)
        .bind(s.sho)
        .bind(s.pas)
        .bind(s.dri)
        .bind(s.def)
        .bind(s.phy)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Overwrite the scores of a player's card, returning the card id, or `None`
/// if the player has no card.
pub struct UpdateCardByPlayer {
    pub id_play: Uuid,
    pub scores: CardRequest,
}

impl Processor<UpdateCardByPlayer> for DatabaseProcessor {
    type Output = Option<Uuid>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateCardByPlayer")]
    async fn process(&self, update: UpdateCardByPlayer) -> Result<Option<Uuid>, sqlx::Error> {
        let s = update.scores;
        sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE card
            SET pac = $1, sho = $2, pas = $3, dri = $4, def = $5, phy = $6
            WHERE id_play = $7
            RETURNING id
            "#,
        )
        .bind(s.pac)
        .bind(s.sho)
        .bind(s.pas)
        .bind(s.dri)
        .bind(s.def)
        .bind(s.phy)
        .bind(update.id_play)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Ids of every card whose player currently plays `id_position`.
pub struct ListCardIdsByPosition {
    pub id_position: i32,
}

impl Processor<ListCardIdsByPosition> for DatabaseProcessor {
    type Output = Vec<Uuid>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListCardIdsByPosition")]
    async fn process(&self, query: ListCardIdsByPosition) -> Result<Vec<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT c.id
            FROM card c
            JOIN play p ON p.id = c.id_play
            WHERE p.id_position = $1
            "#,
        )
        .bind(query.id_position)
        .fetch_all(&self.pool)
        .await
    }
}
