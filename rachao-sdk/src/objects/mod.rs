pub mod attributes;
pub mod card;
pub mod health;
pub mod modality;
pub mod nation;
pub mod overall;
pub mod photo;
pub mod player;
pub mod position;

pub use attributes::{Attributes, AttributesRequest};
pub use card::{Card, CardPlayer, CardRequest};
pub use health::Healthz;
pub use modality::{CreateModalityRequest, Modality};
pub use nation::{CreateNationRequest, Nation};
pub use overall::{routing_key_for_player, Overall, OverallPayload, OverallRequest};
pub use photo::PhotoCreated;
pub use player::{CreatePlayerRequest, Player};
pub use position::{CreatePositionRequest, Position};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// `{"data": ...}` envelope used by every read endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `{"id": ...}` envelope returned after a create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse<I> {
    pub id: I,
}

/// `{"message": ...}` envelope for writes that return nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{"error": ...}` envelope for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
