//! HTTP handlers.
//!
//! # Endpoints
//!
//! - `/play`, `/card`, `/cardplay`    : players and their cards
//! - `/nation`, `/position`, `/modality`: reference data
//! - `/attributes`                    : per-position skill weights
//! - `/photo`                         : player photos (raw JPEG)
//! - `/overall`                       : derived ratings, written by the consumer
//!
//! Card, player and attribute writes republish overall payloads before they
//! respond. A publish failure turns the response into a 500 even though the
//! write itself has committed.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rachao_core::processors::PublishError;
use rachao_sdk::objects::ErrorResponse;

use crate::state::AppState;

pub mod extractors;

mod attributes;
mod card_players;
mod cards;
mod modalities;
mod nations;
mod overall;
mod photos;
mod players;
mod positions;

/// Build the CRUD router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(players::router())
        .merge(cards::router())
        .merge(card_players::router())
        .merge(nations::router())
        .merge(positions::router())
        .merge(attributes::router())
        .merge(photos::router())
        .merge(modalities::router())
        .merge(overall::router())
}

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

/// Errors that can occur in API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("overall publish failed: {0}")]
    Publish(#[from] PublishError),
}

pub(crate) const INVALID_ID: &str = "Invalid ID format";
pub(crate) const INVALID_BODY: &str = "Invalid request body";

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
            ApiError::Database(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::debug!(error = %e, "Unique constraint violated");
                (StatusCode::CONFLICT, "Resource already exists".to_string())
            }
            ApiError::Database(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                tracing::debug!(error = %e, "Foreign key constraint violated");
                (
                    StatusCode::BAD_REQUEST,
                    "Referenced resource does not exist or is still in use".to_string(),
                )
            }
            ApiError::Database(e) => {
                tracing::error!(error = %e, "API database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            ApiError::Publish(e) => {
                tracing::error!(error = %e, "Failed to publish overall payload");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
