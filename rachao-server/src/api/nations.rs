use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};
use kanau::processor::Processor;
use rachao_core::entities::nation::{CreateNation, GetNationById, ListNations, UpdateNation};
use rachao_sdk::objects::{CreateNationRequest, DataResponse, IdResponse, MessageResponse, Nation};

use super::ApiError;
use super::extractors::{IdPath, JsonBody};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/nation", get(list_nations).post(create_nation))
        .route("/nation/{id}", get(get_nation).put(update_nation))
}

fn validate(nation: &CreateNationRequest) -> Result<(), ApiError> {
    if nation.name.trim().is_empty() || nation.acronym.trim().is_empty() {
        return Err(ApiError::bad_request("Name and acronym are required"));
    }
    Ok(())
}

async fn list_nations(state: State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let records = state.processor().process(ListNations).await?;
    let nations: Vec<Nation> = records.into_iter().map(Nation::from).collect();
    Ok(Json(DataResponse::new(nations)))
}

async fn get_nation(
    state: State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let nation = state
        .processor()
        .process(GetNationById { id })
        .await?
        .ok_or_else(|| ApiError::not_found("Nation not found"))?;
    Ok(Json(DataResponse::new(Nation::from(nation))))
}

async fn create_nation(
    state: State<AppState>,
    JsonBody(nation): JsonBody<CreateNationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&nation)?;
    let id = state.processor().process(CreateNation { nation }).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

async fn update_nation(
    state: State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(nation): JsonBody<CreateNationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&nation)?;
    if !state.processor().process(UpdateNation { id, nation }).await? {
        return Err(ApiError::not_found("Nation not found"));
    }
    Ok(Json(MessageResponse::new("Nation updated successfully")))
}
