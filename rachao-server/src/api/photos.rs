//! `/photo/{id_play}`: one JPEG per player, uploaded as the multipart field
//! `photo` and served back as raw bytes.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use kanau::processor::Processor;
use rachao_core::entities::photo::{CreatePhoto, DeletePhoto, GetPhotoByPlayer, UpdatePhoto};
use rachao_core::entities::player::GetPlayerById;
use rachao_sdk::objects::{MessageResponse, PhotoCreated};
use uuid::Uuid;

use super::ApiError;
use super::extractors::IdPath;
use crate::state::AppState;

const PHOTO_FIELD: &str = "photo";
const MAX_PHOTO_BYTES: usize = 8 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/photo/{id_play}",
            get(get_photo)
                .post(create_photo)
                .put(update_photo)
                .delete(delete_photo),
        )
        .layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES))
}

/// Pull the `photo` field out of a multipart form.
async fn read_photo(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!(error = %e, "Malformed multipart body");
        ApiError::bad_request("Error getting photo from form")
    })? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let bytes = field.bytes().await.map_err(|e| {
            tracing::debug!(error = %e, "Failed to read photo field");
            ApiError::bad_request("Error reading photo file")
        })?;
        if bytes.is_empty() {
            return Err(ApiError::bad_request("Photo file is empty"));
        }
        return Ok(bytes.to_vec());
    }
    Err(ApiError::bad_request("Error getting photo from form"))
}

async fn get_photo(
    state: State<AppState>,
    IdPath(id_play): IdPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let photo = state
        .processor()
        .process(GetPhotoByPlayer { id_play })
        .await?
        .ok_or_else(|| ApiError::not_found("No photo found"))?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], photo.photo))
}

async fn create_photo(
    state: State<AppState>,
    IdPath(id_play): IdPath<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();
    if processor.process(GetPlayerById { id: id_play }).await?.is_none() {
        return Err(ApiError::not_found("Player not found"));
    }

    let photo = read_photo(multipart).await?;
    let id = processor
        .process(CreatePhoto { id_play, photo })
        .await?
        .ok_or_else(|| ApiError::conflict("Photo already exists"))?;
    Ok((StatusCode::CREATED, Json(PhotoCreated { id, id_play })))
}

async fn update_photo(
    state: State<AppState>,
    IdPath(id_play): IdPath<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let photo = read_photo(multipart).await?;
    if !state
        .processor()
        .process(UpdatePhoto { id_play, photo })
        .await?
    {
        return Err(ApiError::not_found("No photo found"));
    }
    Ok(Json(MessageResponse::new("Photo updated successfully")))
}

async fn delete_photo(
    state: State<AppState>,
    IdPath(id_play): IdPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.processor().process(DeletePhoto { id_play }).await? {
        return Err(ApiError::not_found("No photo found"));
    }
    Ok(Json(MessageResponse::new("Photo deleted successfully")))
}
