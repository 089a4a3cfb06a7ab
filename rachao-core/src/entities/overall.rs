use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use rachao_sdk::objects::Overall;
use uuid::Uuid;

/// A row of the `overall` table. `id_play` is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct OverallRecord {
    pub id: Uuid,
    pub id_play: Uuid,
    pub overall: i32,
}

impl From<OverallRecord> for Overall {
    fn from(r: OverallRecord) -> Self {
        Overall {
            id: r.id,
            id_play: r.id_play,
            overall: r.overall,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverallExists {
    pub id_play: Uuid,
}

impl Processor<OverallExists> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:OverallExists")]
    async fn process(&self, query: OverallExists) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM overall WHERE id_play = $1)")
            .bind(query.id_play)
            .fetch_one(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
/// Insert the overall of a player.
///
/// Conflicts on `id_play` fall through to an update of the rating, so two
/// racing creates for one player end on a single row whose id never changes.
pub struct CreateOverall {
    pub id_play: Uuid,
    pub overall: i32,
}

impl Processor<CreateOverall> for DatabaseProcessor {
    type Output = Uuid;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateOverall")]
    async fn process(&self, insert: CreateOverall) -> Result<Uuid, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO overall (id_play, overall)
            VALUES ($1, $2)
            ON CONFLICT (id_play) DO UPDATE SET overall = EXCLUDED.overall
            RETURNING id
            "#,
        )
        .bind(insert.id_play)
        .bind(insert.overall)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdateOverall {
    pub id_play: Uuid,
    pub overall: i32,
}

impl Processor<UpdateOverall> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateOverall")]
    async fn process(&self, update: UpdateOverall) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE overall SET overall = $1 WHERE id_play = $2")
            .bind(update.overall)
            .bind(update.id_play)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone)]
pub struct GetOverallByPlayer {
    pub id_play: Uuid,
}

impl Processor<GetOverallByPlayer> for DatabaseProcessor {
    type Output = Option<OverallRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetOverallByPlayer")]
    async fn process(&self, query: GetOverallByPlayer) -> Result<Option<OverallRecord>, sqlx::Error> {
        sqlx::query_as::<_, OverallRecord>(
            "SELECT id, id_play, overall FROM overall WHERE id_play = $1",
        )
        .bind(query.id_play)
        .fetch_optional(&self.pool)
        .await
    }
}
