use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use rachao_sdk::objects::{CreatePlayerRequest, Player};
use uuid::Uuid;

/// A row of the `play` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PlayerRecord {
    pub id: Uuid,
    pub name: String,
    pub id_position: i32,
    pub id_nation: i32,
    pub field: bool,
    pub active: bool,
}

impl From<PlayerRecord> for Player {
    fn from(r: PlayerRecord) -> Self {
        Player {
            id: r.id,
            name: r.name,
            id_position: r.id_position,
            id_nation: r.id_nation,
            field: r.field,
            active: r.active,
        }
    }
}

#[derive(Debug, Clone)]
/// List players filtered by their `active` flag.
pub struct ListPlayers {
    pub active: bool,
}

impl Processor<ListPlayers> for DatabaseProcessor {
    type Output = Vec<PlayerRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListPlayers")]
    async fn process(&self, query: ListPlayers) -> Result<Vec<PlayerRecord>, sqlx::Error> {
        sqlx::query_as::<_, PlayerRecord>(
            r#"
            SELECT id, name, id_position, id_nation, field, active
            FROM play
            WHERE active = $1
            ORDER BY name
            "#,
        )
        .bind(query.active)
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct GetPlayerById {
    pub id: Uuid,
}

impl Processor<GetPlayerById> for DatabaseProcessor {
    type Output = Option<PlayerRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetPlayerById")]
    async fn process(&self, query: GetPlayerById) -> Result<Option<PlayerRecord>, sqlx::Error> {
        sqlx::query_as::<_, PlayerRecord>(
            r#"
            SELECT id, name, id_position, id_nation, field, active
            FROM play
            WHERE id = $1
            "#,
        )
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Look a player up by exact name.
pub struct GetPlayerByName {
    pub name: String,
}

impl Processor<GetPlayerByName> for DatabaseProcessor {
    type Output = Option<PlayerRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetPlayerByName")]
    async fn process(&self, query: GetPlayerByName) -> Result<Option<PlayerRecord>, sqlx::Error> {
        sqlx::query_as::<_, PlayerRecord>(
            r#"
            SELECT id, name, id_position, id_nation, field, active
            FROM play
            WHERE name = $1
            "#,
        )
        .bind(query.name)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Insert a player, returning its generated id.
pub struct CreatePlayer {
    pub player: CreatePlayerRequest,
}

impl Processor<CreatePlayer> for DatabaseProcessor {
    type Output = Uuid;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreatePlayer")]
    async fn process(&self, insert: CreatePlayer) -> Result<Uuid, sqlx::Error> {
        let p = insert.player;
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO play (name, id_position, id_nation, field, active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(p.name)
        .bind(p.id_position)
        .bind(p.id_nation)
        .bind(p.field)
        .bind(p.active)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Overwrite every column of a player. Returns `false` if no row matched.
pub struct UpdatePlayer {
    pub id: Uuid,
    pub player: CreatePlayerRequest,
}

impl Processor<UpdatePlayer> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdatePlayer")]
    async fn process(&self, update: UpdatePlayer) -> Result<bool, sqlx::Error> {
        let p = update.player;
        let result = sqlx::query(
            r#"
            UPDATE play
            SET name = $1, id_position = $2, id_nation = $3, field = $4, active = $5
            WHERE id = $6
            "#,
        )
        .bind(p.name)
        .bind(p.id_position)
        .bind(p.id_nation)
        .bind(p.field)
        .bind(p.active)
        .bind(update.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone)]
/// Soft delete: players are never removed, only marked inactive.
pub struct DeactivatePlayer {
    pub id: Uuid,
}

impl Processor<DeactivatePlayer> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeactivatePlayer")]
    async fn process(&self, update: DeactivatePlayer) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE play SET active = false WHERE id = $1")
            .bind(update.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
