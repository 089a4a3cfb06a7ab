use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use rachao_sdk::objects::{CreateModalityRequest, Modality};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ModalityRecord {
    pub id: i32,
    pub name: String,
    pub amount_play: i32,
    pub active: bool,
}

impl From<ModalityRecord> for Modality {
    fn from(r: ModalityRecord) -> Self {
        Modality {
            id: r.id,
            name: r.name,
            amount_play: r.amount_play,
            active: r.active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListModalities {
    pub active: bool,
}

impl Processor<ListModalities> for DatabaseProcessor {
    type Output = Vec<ModalityRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListModalities")]
    async fn process(&self, query: ListModalities) -> Result<Vec<ModalityRecord>, sqlx::Error> {
        sqlx::query_as::<_, ModalityRecord>(
            r#"
            SELECT id, name, amount_play, active
            FROM modality
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
pub struct GetModalityById {
    pub id: i32,
}

impl Processor<GetModalityById> for DatabaseProcessor {
    type Output = Option<ModalityRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetModalityById")]
    async fn process(&self, query: GetModalityById) -> Result<Option<ModalityRecord>, sqlx::Error> {
        sqlx::query_as::<_, ModalityRecord>(
            "SELECT id, name, amount_play, active FROM modality WHERE id = $1",
        )
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct GetModalityByName {
    pub name: String,
}

impl Processor<GetModalityByName> for DatabaseProcessor {
    type Output = Option<ModalityRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetModalityByName")]
    async fn process(
        &self,
        query: GetModalityByName,
    ) -> Result<Option<ModalityRecord>, sqlx::Error> {
        sqlx::query_as::<_, ModalityRecord>(
            "SELECT id, name, amount_play, active FROM modality WHERE name = $1",
        )
        .bind(query.name)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct CreateModality {
    pub modality: CreateModalityRequest,
}

impl Processor<CreateModality> for DatabaseProcessor {
    type Output = i32;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateModality")]
    async fn process(&self, insert: CreateModality) -> Result<i32, sqlx::Error> {
        let m = insert.modality;
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO modality (name, amount_play, active) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(m.name)
        .bind(m.amount_play)
        .bind(m.active)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdateModality {
    pub id: i32,
    pub modality: CreateModalityRequest,
}

impl Processor<UpdateModality> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateModality")]
    async fn process(&self, update: UpdateModality) -> Result<bool, sqlx::Error> {
        let m = update.modality;
        let result = sqlx::query(
            "UPDATE modality SET name = $1, amount_play = $2, active = $3 WHERE id = $4",
        )
        .bind(m.name)
        .bind(m.amount_play)
        .bind(m.active)
        .bind(update.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone)]
/// Toggle a modality on or off without touching its other columns.
pub struct SetModalityActive {
    pub id: i32,
    pub active: bool,
}

impl Processor<SetModalityActive> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SetModalityActive")]
    async fn process(&self, update: SetModalityActive) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE modality SET active = $1 WHERE id = $2")
            .bind(update.active)
            .bind(update.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
