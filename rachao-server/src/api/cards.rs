//! `/card/{id_play}`: a player's card. Every write publishes the player's
//! overall payload.

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};
use kanau::processor::Processor;
use rachao_core::entities::card::{CreateCard, GetCardByPlayer, UpdateCardByPlayer};
use rachao_core::entities::player::GetPlayerById;
use rachao_sdk::objects::{Card, CardRequest, DataResponse, IdResponse, MessageResponse};
use uuid::Uuid;

use super::ApiError;
use super::extractors::{IdPath, JsonBody};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/card/{id_play}",
        get(get_card).post(create_card).put(update_card),
    )
}

async fn get_card(
    state: State<AppState>,
    IdPath(id_play): IdPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state
        .processor()
        .process(GetCardByPlayer { id_play })
        .await?
        .ok_or_else(|| ApiError::not_found("Card not found"))?;
    Ok(Json(DataResponse::new(Card::from(card))))
}

/// `POST /card/{id_play}`: create the card of a player, then publish.
async fn create_card(
    state: State<AppState>,
    IdPath(id_play): IdPath<Uuid>,
    JsonBody(scores): JsonBody<CardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let processor = state.processor();

    if processor.process(GetPlayerById { id: id_play }).await?.is_none() {
        return Err(ApiError::not_found("Player not found"));
    }

    let id = processor
        .process(CreateCard { id_play, scores })
        .await?
        .ok_or_else(|| ApiError::conflict("Card already exists for this player"))?;
    tracing::info!(card_id = %id, player_id = %id_play, "Card created");

    state.producer.publish(id).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// `PUT /card/{id_play}`: overwrite the scores, then publish.
async fn update_card(
    state: State<AppState>,
    IdPath(id_play): IdPath<Uuid>,
    JsonBody(scores): JsonBody<CardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if scores.is_empty() {
        return Err(ApiError::bad_request("Request body cannot be null"));
    }

    let id = state
        .processor()
        .process(UpdateCardByPlayer { id_play, scores })
        .await?
        .ok_or_else(|| ApiError::not_found("Card not found"))?;

    state.producer.publish(id).await?;
    Ok(Json(MessageResponse::new("Card updated successfully")))
}
