use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use kanau::processor::Processor;
use rachao_core::entities::overall::GetOverallByPlayer;
use rachao_sdk::objects::{DataResponse, Overall};
use uuid::Uuid;

use super::ApiError;
use super::extractors::IdPath;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/overall/{id_play}", get(get_overall))
}

/// `GET /overall/{id_play}`: 404 until the consumer has rated the player.
async fn get_overall(
    state: State<AppState>,
    IdPath(id_play): IdPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let overall = state
        .processor()
        .process(GetOverallByPlayer { id_play })
        .await?
        .ok_or_else(|| ApiError::not_found("Overall not found"))?;
    Ok(Json(DataResponse::new(Overall::from(overall))))
}
