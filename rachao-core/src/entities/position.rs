use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use rachao_sdk::objects::{CreatePositionRequest, Position};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PositionRecord {
    pub id: i32,
    pub name: String,
    pub acronym: String,
}

impl From<PositionRecord> for Position {
    fn from(r: PositionRecord) -> Self {
        Position {
            id: r.id,
            name: r.name,
            acronym: r.acronym,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListPositions;

impl Processor<ListPositions> for DatabaseProcessor {
    type Output = Vec<PositionRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListPositions")]
    async fn process(&self, _query: ListPositions) -> Result<Vec<PositionRecord>, sqlx::Error> {
        sqlx::query_as::<_, PositionRecord>(
            "SELECT id, name, acronym FROM position ORDER BY name DESC",
        )
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct GetPositionById {
    pub id: i32,
}

impl Processor<GetPositionById> for DatabaseProcessor {
    type Output = Option<PositionRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetPositionById")]
    async fn process(&self, query: GetPositionById) -> Result<Option<PositionRecord>, sqlx::Error> {
        sqlx::query_as::<_, PositionRecord>("SELECT id, name, acronym FROM position WHERE id = $1")
            .bind(query.id)
            .fetch_optional(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct CreatePosition {
    pub position: CreatePositionRequest,
}

impl Processor<CreatePosition> for DatabaseProcessor {
    type Output = i32;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreatePosition")]
    async fn process(&self, insert: CreatePosition) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO position (name, acronym) VALUES ($1, $2) RETURNING id",
        )
        .bind(insert.position.name)
        .bind(insert.position.acronym)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePosition {
    pub id: i32,
    pub position: CreatePositionRequest,
}

impl Processor<UpdatePosition> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdatePosition")]
    async fn process(&self, update: UpdatePosition) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE position SET name = $1, acronym = $2 WHERE id = $3")
            .bind(update.position.name)
            .bind(update.position.acronym)
            .bind(update.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone)]
/// Delete a position. Fails with a foreign-key violation while players or an
/// attribute set still reference it.
pub struct DeletePosition {
    pub id: i32,
}

impl Processor<DeletePosition> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeletePosition")]
    async fn process(&self, delete: DeletePosition) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM position WHERE id = $1")
            .bind(delete.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
