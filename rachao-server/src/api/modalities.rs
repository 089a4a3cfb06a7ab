use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use kanau::processor::Processor;
use rachao_core::entities::modality::{
    CreateModality, GetModalityById, GetModalityByName, ListModalities, SetModalityActive,
    UpdateModality,
};
use rachao_sdk::objects::{
    CreateModalityRequest, DataResponse, IdResponse, MessageResponse, Modality,
};

use super::ApiError;
use super::extractors::{IdPath, JsonBody};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/modality", get(list_active).post(create_modality))
        .route("/modality/inactive", get(list_inactive))
        .route("/modality/{id}", get(get_modality).put(update_modality))
        .route("/modality/{id}/active", post(activate_modality))
        .route("/modality/{id}/inactive", post(deactivate_modality))
}

fn validate(modality: &CreateModalityRequest) -> Result<(), ApiError> {
    if modality.name.trim().is_empty() {
        return Err(ApiError::bad_request("Modality name is required"));
    }
    if modality.amount_play <= 0 {
        return Err(ApiError::bad_request("amount_play must be positive"));
    }
    Ok(())
}

async fn list(state: &AppState, active: bool) -> Result<Vec<Modality>, ApiError> {
    let records = state.processor().process(ListModalities { active }).await?;
    Ok(records.into_iter().map(Modality::from).collect())
}

async fn list_active(state: State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(DataResponse::new(list(&state, true).await?)))
}

async fn list_inactive(state: State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(DataResponse::new(list(&state, false).await?)))
}

async fn get_modality(
    state: State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let modality = state
        .processor()
        .process(GetModalityById { id })
        .await?
        .ok_or_else(|| ApiError::not_found("Modality not found"))?;
    Ok(Json(DataResponse::new(Modality::from(modality))))
}

/// `POST /modality`: names are unique.
async fn create_modality(
    state: State<AppState>,
    JsonBody(modality): JsonBody<CreateModalityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&modality)?;
    let processor = state.processor();

    let existing = processor
        .process(GetModalityByName {
            name: modality.name.clone(),
        })
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict("Modality already exists"));
    }

    let id = processor.process(CreateModality { modality }).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

async fn update_modality(
    state: State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(modality): JsonBody<CreateModalityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&modality)?;
    if !state
        .processor()
        .process(UpdateModality { id, modality })
        .await?
    {
        return Err(ApiError::not_found("Modality not found"));
    }
    Ok(Json(MessageResponse::new("Modality updated successfully")))
}

async fn set_active(state: &AppState, id: i32, active: bool) -> Result<(), ApiError> {
    if !state
        .processor()
        .process(SetModalityActive { id, active })
        .await?
    {
        return Err(ApiError::not_found("Modality not found"));
    }
    Ok(())
}

async fn activate_modality(
    state: State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    set_active(&state, id, true).await?;
    Ok(Json(MessageResponse::new("Modality activated successfully")))
}

async fn deactivate_modality(
    state: State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    set_active(&state, id, false).await?;
    Ok(Json(MessageResponse::new("Modality inactivated successfully")))
}
