use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub id_position: i32,
    pub id_nation: i32,
    pub field: bool,
    pub active: bool,
}

/// Body of `POST /play` and `PUT /play/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePlayerRequest {
    pub name: String,
    pub id_position: i32,
    pub id_nation: i32,
    #[serde(default)]
    pub field: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
