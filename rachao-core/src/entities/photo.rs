use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use uuid::Uuid;

/// A stored player photo. The image is kept as raw JPEG bytes.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PhotoRecord {
    pub id: Uuid,
    pub id_play: Uuid,
    pub photo: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct GetPhotoByPlayer {
    pub id_play: Uuid,
}

impl Processor<GetPhotoByPlayer> for DatabaseProcessor {
    type Output = Option<PhotoRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetPhotoByPlayer")]
    async fn process(&self, query: GetPhotoByPlayer) -> Result<Option<PhotoRecord>, sqlx::Error> {
        sqlx::query_as::<_, PhotoRecord>(
            "SELECT id, id_play, photo FROM photo WHERE id_play = $1 LIMIT 1",
        )
        .bind(query.id_play)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Store the photo of a player. `None` if the player already has one.
pub struct CreatePhoto {
    pub id_play: Uuid,
    pub photo: Vec<u8>,
}

impl Processor<CreatePhoto> for DatabaseProcessor {
    type Output = Option<Uuid>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreatePhoto")]
    async fn process(&self, insert: CreatePhoto) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO photo (id_play, photo)
            VALUES ($1, $2)
            ON CONFLICT (id_play) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(insert.id_play)
        .bind(insert.photo)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePhoto {
    pub id_play: Uuid,
    pub photo: Vec<u8>,
}

impl Processor<UpdatePhoto> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdatePhoto")]
    async fn process(&self, update: UpdatePhoto) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE photo SET photo = $1 WHERE id_play = $2")
            .bind(update.photo)
            .bind(update.id_play)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone)]
pub struct DeletePhoto {
    pub id_play: Uuid,
}

impl Processor<DeletePhoto> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeletePhoto")]
    async fn process(&self, delete: DeletePhoto) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM photo WHERE id_play = $1")
            .bind(delete.id_play)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
