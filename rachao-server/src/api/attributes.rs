//! `/attributes`: the skill weights of each position.
//!
//! Changing a weight set changes the overall of every player in that
//! position, so updates republish all of their cards.

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};
use kanau::processor::Processor;
use rachao_core::entities::attributes::{
    CreateAttributes, DeleteAttributes, GetAttributesById, GetAttributesByPosition,
    ListAttributes, UpdateAttributes,
};
use rachao_core::entities::position::GetPositionById;
use rachao_sdk::objects::{
    Attributes, AttributesRequest, DataResponse, IdResponse, MessageResponse,
};

use super::ApiError;
use super::extractors::{IdPath, JsonBody};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/attributes", get(list_attributes).post(create_attributes))
        .route("/attributes/position/{id_position}", get(get_by_position))
        .route(
            "/attributes/{id}",
            get(get_attributes)
                .put(update_attributes)
                .delete(delete_attributes),
        )
}

async fn list_attributes(state: State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let records = state.processor().process(ListAttributes).await?;
    let attributes: Vec<Attributes> = records.into_iter().map(Attributes::from).collect();
    Ok(Json(DataResponse::new(attributes)))
}

async fn get_attributes(
    state: State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let attributes = state
        .processor()
        .process(GetAttributesById { id })
        .await?
        .ok_or_else(|| ApiError::not_found("Attributes not found"))?;
    Ok(Json(DataResponse::new(Attributes::from(attributes))))
}

async fn get_by_position(
    state: State<AppState>,
    IdPath(id_position): IdPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let attributes = state
        .processor()
        .process(GetAttributesByPosition { id_position })
        .await?
        .ok_or_else(|| ApiError::not_found("Attributes not found"))?;
    Ok(Json(DataResponse::new(Attributes::from(attributes))))
}

/// `POST /attributes`: one weight set per position.
async fn create_attributes(
    state: State<AppState>,
    JsonBody(attributes): JsonBody<AttributesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();

    let position = processor
        .process(GetPositionById {
            id: attributes.id_position,
        })
        .await?;
    if position.is_none() {
        return Err(ApiError::not_found("Position not found"));
    }

    let id = processor
        .process(CreateAttributes { attributes })
        .await?
        .ok_or_else(|| ApiError::conflict("Position already has attributes"))?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// `PUT /attributes/{id}`: overwrite a weight set and republish the overall
/// of every card in the position it now belongs to.
async fn update_attributes(
    state: State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(attributes): JsonBody<AttributesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id_position = attributes.id_position;
    if !state
        .processor()
        .process(UpdateAttributes { id, attributes })
        .await?
    {
        return Err(ApiError::not_found("Attributes not found"));
    }

    state.producer.publish_for_position(id_position).await?;
    Ok(Json(MessageResponse::new("Attributes updated successfully")))
}

async fn delete_attributes(
    state: State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.processor().process(DeleteAttributes { id }).await? {
        return Err(ApiError::not_found("Attributes not found"));
    }
    Ok(Json(MessageResponse::new("Attributes deleted successfully")))
}
