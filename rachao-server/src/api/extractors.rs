//! Custom Axum extractors that reject with the API's JSON error envelope.
//!
//! - `IdPath<T>` parses the single path parameter into `T`, rejecting with
//!   400 `Invalid ID format`.
//! - `JsonBody<T>` deserializes the JSON body, rejecting with 400
//!   `Invalid request body`.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use std::str::FromStr;

use super::{ApiError, INVALID_BODY, INVALID_ID};

/// A path id parsed with `FromStr`.
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: FromStr + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request(INVALID_ID))?;
        raw.parse()
            .map(IdPath)
            .map_err(|_| ApiError::bad_request(INVALID_ID))
    }
}

/// A JSON request body.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection, "Rejected request body");
            ApiError::bad_request(INVALID_BODY)
        })?;
        Ok(JsonBody(value))
    }
}
