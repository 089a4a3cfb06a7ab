//! `/cardplay`: players joined with their cards. Players without a card are
//! not listed.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use kanau::processor::Processor;
use rachao_core::entities::card_player::{GetCardPlayer, ListCardPlayers};
use rachao_sdk::objects::{CardPlayer, DataResponse};
use uuid::Uuid;

use super::ApiError;
use super::extractors::IdPath;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cardplay", get(list_active))
        .route("/cardplay/inactive", get(list_inactive))
        .route("/cardplay/{id_play}", get(get_card_player))
}

async fn list(state: &AppState, active: bool) -> Result<Vec<CardPlayer>, ApiError> {
    let records = state.processor().process(ListCardPlayers { active }).await?;
    Ok(records.into_iter().map(CardPlayer::from).collect())
}

async fn list_active(state: State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(DataResponse::new(list(&state, true).await?)))
}

async fn list_inactive(state: State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(DataResponse::new(list(&state, false).await?)))
}

async fn get_card_player(
    state: State<AppState>,
    IdPath(id_play): IdPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .processor()
        .process(GetCardPlayer { id_play })
        .await?
        .ok_or_else(|| ApiError::not_found("Card not found"))?;
    Ok(Json(DataResponse::new(CardPlayer::from(record))))
}
