use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use rachao_sdk::objects::{Attributes, AttributesRequest};

/// A row of the `attributes` table. `id_position` is unique: at most one
/// weight set per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct AttributesRecord {
    pub id: i32,
    pub id_position: i32,
    pub pac: i32,
    pub sho: i32,
    pub pas: i32,
    pub dri: i32,
    pub def: i32,
    pub phy: i32,
}

impl From<AttributesRecord> for Attributes {
    fn from(r: AttributesRecord) -> Self {
        Attributes {
            id: r.id,
            id_position: r.id_position,
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
pub struct ListAttributes;

impl Processor<ListAttributes> for DatabaseProcessor {
    type Output = Vec<AttributesRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListAttributes")]
    async fn process(&self, _query: ListAttributes) -> Result<Vec<AttributesRecord>, sqlx::Error> {
        sqlx::query_as::<_, AttributesRecord>(
            r#"
            SELECT id, id_position, pac, sho, pas, dri, def, phy
            FROM attributes
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct GetAttributesById {
    pub id: i32,
}

impl Processor<GetAttributesById> for DatabaseProcessor {
    type Output = Option<AttributesRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetAttributesById")]
    async fn process(&self, query: GetAttributesById) -> Result<Option<AttributesRecord>, sqlx::Error> {
        sqlx::query_as::<_, AttributesRecord>(
            r#"
            SELECT id, id_position, pac, sho, pas, dri, def, phy
            FROM attributes
            WHERE id = $1
            "#,
        )
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct GetAttributesByPosition {
    pub id_position: i32,
}

impl Processor<GetAttributesByPosition> for DatabaseProcessor {
    type Output = Option<AttributesRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetAttributesByPosition")]
    async fn process(
        &self,
        query: GetAttributesByPosition,
    ) -> Result<Option<AttributesRecord>, sqlx::Error> {
        sqlx::query_as::<_, AttributesRecord>(
            r#"
            SELECT id, id_position, pac, sho, pas, dri, def, phy
            FROM attributes
            WHERE id_position = $1
            "#,
        )
        .bind(query.id_position)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Insert the weight set of a position. `None` if the position already has one.
pub struct CreateAttributes {
    pub attributes: AttributesRequest,
}

impl Processor<CreateAttributes> for DatabaseProcessor {
    type Output = Option<i32>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateAttributes")]
    async fn process(&self, insert: CreateAttributes) -> Result<Option<i32>, sqlx::Error> {
        let a = insert.attributes;
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO attributes (id_position, pac, sho, pas, dri, def, phy)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id_position) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(a.id_position)
        .bind(a.pac)
        .bind(a.sho)
        .bind(a.pas)
        .bind(a.dri)
        .bind(a.def)
        .bind(a.phy)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdateAttributes {
    pub id: i32,
    pub attributes: AttributesRequest,
}

impl Processor<UpdateAttributes> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateAttributes")]
    async fn process(&self, update: UpdateAttributes) -> Result<bool, sqlx::Error> {
        let a = update.attributes;
        let result = sqlx::query(
            r#"
            UPDATE attributes
            SET id_position = $1, pac = $2, sho = $3, pas = $4, dri = $5, def = $6, phy = $7
            WHERE id = $8
            "#,
        )
        .bind(a.id_position)
        .bind(a.pac)
        .bind(a.sho)
        .bind(a.pas)
        .bind(a.dri)
        .bind(a.def)
        .bind(a.phy)
        .bind(update.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteAttributes {
    pub id: i32,
}

impl Processor<DeleteAttributes> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteAttributes")]
    async fn process(&self, delete: DeleteAttributes) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attributes WHERE id = $1")
            .bind(delete.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
