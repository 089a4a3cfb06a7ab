use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};
use kanau::processor::Processor;
use rachao_core::entities::position::{
    CreatePosition, DeletePosition, GetPositionById, ListPositions, UpdatePosition,
};
use rachao_sdk::objects::{
    CreatePositionRequest, DataResponse, IdResponse, MessageResponse, Position,
};

use super::ApiError;
use super::extractors::{IdPath, JsonBody};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/position", get(list_positions).post(create_position))
        .route(
            "/position/{id}",
            get(get_position).put(update_position).delete(delete_position),
        )
}

fn validate(position: &CreatePositionRequest) -> Result<(), ApiError> {
    if position.name.trim().is_empty() || position.acronym.trim().is_empty() {
        return Err(ApiError::bad_request("Name and acronym are required"));
    }
    Ok(())
}

async fn list_positions(state: State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let records = state.processor().process(ListPositions).await?;
    let positions: Vec<Position> = records.into_iter().map(Position::from).collect();
    Ok(Json(DataResponse::new(positions)))
}

async fn get_position(
    state: State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let position = state
        .processor()
        .process(GetPositionById { id })
        .await?
        .ok_or_else(|| ApiError::not_found("Position not found"))?;
    Ok(Json(DataResponse::new(Position::from(position))))
}

async fn create_position(
    state: State<AppState>,
    JsonBody(position): JsonBody<CreatePositionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&position)?;
    let id = state.processor().process(CreatePosition { position }).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

async fn update_position(
    state: State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(position): JsonBody<CreatePositionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&position)?;
    if !state.processor().process(UpdatePosition { id, position }).await? {
        return Err(ApiError::not_found("Position not found"));
    }
    Ok(Json(MessageResponse::new("Position updated successfully")))
}

/// `DELETE /position/{id}`: refused with 400 while players or an attribute
/// set still reference the position.
async fn delete_position(
    state: State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.processor().process(DeletePosition { id }).await? {
        return Err(ApiError::not_found("Position not found"));
    }
    Ok(Json(MessageResponse::new("Position deleted successfully")))
}
