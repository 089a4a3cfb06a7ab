//! `/play`: players. Deleting a player only marks them inactive.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use kanau::processor::Processor;
use rachao_core::entities::card::GetCardByPlayer;
use rachao_core::entities::player::{
    CreatePlayer, DeactivatePlayer, GetPlayerById, GetPlayerByName, ListPlayers, UpdatePlayer,
};
use rachao_sdk::objects::{CreatePlayerRequest, DataResponse, IdResponse, MessageResponse, Player};
use uuid::Uuid;

use super::ApiError;
use super::extractors::{IdPath, JsonBody};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/play", get(list_active).post(create_player))
        .route("/play/inactive", get(list_inactive))
        .route("/play/name/{name}", get(get_player_by_name))
        .route(
            "/play/{id}",
            get(get_player).put(update_player).delete(delete_player),
        )
}

fn validate(player: &CreatePlayerRequest) -> Result<(), ApiError> {
    if player.name.trim().is_empty() {
        return Err(ApiError::bad_request("Player name is required"));
    }
    Ok(())
}

async fn list_players(state: &AppState, active: bool) -> Result<Vec<Player>, ApiError> {
    let records = state.processor().process(ListPlayers { active }).await?;
    Ok(records.into_iter().map(Player::from).collect())
}

/// `GET /play`: active players, by name.
async fn list_active(state: State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(DataResponse::new(list_players(&state, true).await?)))
}

/// `GET /play/inactive`: players that were deleted.
async fn list_inactive(state: State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(DataResponse::new(list_players(&state, false).await?)))
}

async fn get_player(
    state: State<AppState>,
    IdPath(id): IdPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let player = state
        .processor()
        .process(GetPlayerById { id })
        .await?
        .ok_or_else(|| ApiError::not_found("Player not found"))?;
    Ok(Json(DataResponse::new(Player::from(player))))
}

async fn get_player_by_name(
    state: State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let player = state
        .processor()
        .process(GetPlayerByName { name })
        .await?
        .ok_or_else(|| ApiError::not_found("Player not found"))?;
    Ok(Json(DataResponse::new(Player::from(player))))
}

/// `POST /play`: register a player. Names are unique.
async fn create_player(
    state: State<AppState>,
    JsonBody(player): JsonBody<CreatePlayerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&player)?;
    let processor = state.processor();

    let existing = processor
        .process(GetPlayerByName {
            name: player.name.clone(),
        })
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict("Player already exists"));
    }

    let id = processor.process(CreatePlayer { player }).await?;
    tracing::info!(player_id = %id, "Player created");
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// `PUT /play/{id}`: overwrite a player.
///
/// The position may have changed, so a carded player's overall is
/// republished with the weights of the new position.
async fn update_player(
    state: State<AppState>,
    IdPath(id): IdPath<Uuid>,
    JsonBody(player): JsonBody<CreatePlayerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&player)?;
    let processor = state.processor();

    if !processor.process(UpdatePlayer { id, player }).await? {
        return Err(ApiError::not_found("Player not found"));
    }

    if let Some(card) = processor.process(GetCardByPlayer { id_play: id }).await? {
        state.producer.publish(card.id).await?;
    }

    Ok(Json(MessageResponse::new("Player updated successfully")))
}

/// `DELETE /play/{id}`: mark a player inactive.
async fn delete_player(
    state: State<AppState>,
    IdPath(id): IdPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.processor().process(DeactivatePlayer { id }).await? {
        return Err(ApiError::not_found("Player not found"));
    }
    Ok(Json(MessageResponse::new("Player deleted successfully")))
}
