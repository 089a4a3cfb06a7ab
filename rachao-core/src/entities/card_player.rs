//! Read-only view joining a player with their card.

use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use rachao_sdk::objects::{Card, CardPlayer, Player};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CardPlayerRecord {
    pub play_id: Uuid,
    pub name: String,
    pub id_position: i32,
    pub id_nation: i32,
    pub field: bool,
    pub active: bool,
    pub card_id: Uuid,
    pub pac: i32,
    pub sho: i32,
    pub pas: i32,
    pub dri: i32,
    pub def: i32,
    pub phy: i32,
}

impl From<CardPlayerRecord> for CardPlayer {
    fn from(r: CardPlayerRecord) -> Self {
        CardPlayer {
            play: Player {
                id: r.play_id,
                name: r.name,
                id_position: r.id_position,
                id_nation: r.id_nation,
                field: r.field,
                active: r.active,
            },
            card: Card {
                id: r.card_id,
                id_play: r.play_id,
                pac: r.pac,
                sho: r.sho,
                pas: r.pas,
                dri: r.dri,
                def: r.def,
                phy: r.phy,
            },
        }
    }
}

const SELECT_CARD_PLAYER: &str = r#"
    SELECT
        p.id AS play_id, p.name, p.id_position, p.id_nation, p.field, p.active,
        c.id AS card_id, c.pac, c.sho, c.pas, c.dri, c.def, c.phy
    FROM play p
    INNER JOIN card c ON p.id = c.id_play
"#;

#[derive(Debug, Clone)]
pub struct ListCardPlayers {
    pub active: bool,
}

impl Processor<ListCardPlayers> for DatabaseProcessor {
    type Output = Vec<CardPlayerRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListCardPlayers")]
    async fn process(&self, query: ListCardPlayers) -> Result<Vec<CardPlayerRecord>, sqlx::Error> {
        let sql = format!("{SELECT_CARD_PLAYER} WHERE p.active = $1 ORDER BY p.name");
        sqlx::query_as::<_, CardPlayerRecord>(&sql)
            .bind(query.active)
            .fetch_all(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct GetCardPlayer {
    pub id_play: Uuid,
}

impl Processor<GetCardPlayer> for DatabaseProcessor {
    type Output = Option<CardPlayerRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCardPlayer")]
    async fn process(&self, query: GetCardPlayer) -> Result<Option<CardPlayerRecord>, sqlx::Error> {
        let sql = format!("{SELECT_CARD_PLAYER} WHERE p.id = $1");
        sqlx::query_as::<_, CardPlayerRecord>(&sql)
            .bind(query.id_play)
            .fetch_optional(&self.pool)
            .await
    }
}
