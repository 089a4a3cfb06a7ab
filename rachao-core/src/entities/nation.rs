use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use rachao_sdk::objects::{CreateNationRequest, Nation};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct NationRecord {
    pub id: i32,
    pub name: String,
    pub acronym: String,
}

impl From<NationRecord> for Nation {
    fn from(r: NationRecord) -> Self {
        Nation {
            id: r.id,
            name: r.name,
            acronym: r.acronym,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListNations;

impl Processor<ListNations> for DatabaseProcessor {
    type Output = Vec<NationRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListNations")]
    async fn process(&self, _query: ListNations) -> Result<Vec<NationRecord>, sqlx::Error> {
        sqlx::query_as::<_, NationRecord>("SELECT id, name, acronym FROM nation ORDER BY name")
            .fetch_all(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct GetNationById {
    pub id: i32,
}

impl Processor<GetNationById> for DatabaseProcessor {
    type Output = Option<NationRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetNationById")]
    async fn process(&self, query: GetNationById) -> Result<Option<NationRecord>, sqlx::Error> {
        sqlx::query_as::<_, NationRecord>("SELECT id, name, acronym FROM nation WHERE id = $1")
            .bind(query.id)
            .fetch_optional(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct CreateNation {
    pub nation: CreateNationRequest,
}

impl Processor<CreateNation> for DatabaseProcessor {
    type Output = i32;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateNation")]
    async fn process(&self, insert: CreateNation) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO nation (name, acronym) VALUES ($1, $2) RETURNING id",
        )
        .bind(insert.nation.name)
        .bind(insert.nation.acronym)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdateNation {
    pub id: i32,
    pub nation: CreateNationRequest,
}

impl Processor<UpdateNation> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateNation")]
    async fn process(&self, update: UpdateNation) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE nation SET name = $1, acronym = $2 WHERE id = $3")
            .bind(update.nation.name)
            .bind(update.nation.acronym)
            .bind(update.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
