use serde::{Deserialize, Serialize};

/// Body of `GET /healthz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Healthz {
    pub message: String,
    pub version: String,
    pub status: String,
}

impl Healthz {
    pub fn up(version: impl Into<String>) -> Self {
        Self {
            message: "system is up".to_string(),
            version: version.into(),
            status: "ok".to_string(),
        }
    }
}
