use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Returned after a photo upload. The image itself is served as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoCreated {
    pub id: Uuid,
    pub id_play: Uuid,
}
