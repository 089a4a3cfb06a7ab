//! Per-position weights of the six card sub-scores.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    pub id: i32,
    pub id_position: i32,
    pub pac: i32,
    pub sho: i32,
    pub pas: i32,
    pub dri: i32,
    pub def: i32,
    pub phy: i32,
}

impl Attributes {
    /// The six weights in `pac, sho, pas, dri, def, phy` order.
    pub fn weights(&self) -> [i32; 6] {
        [self.pac, self.sho, self.pas, self.dri, self.def, self.phy]
    }
}

/// Body of `POST /attributes` and `PUT /attributes/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributesRequest {
    pub id_position: i32,
    pub pac: i32,
    pub sho: i32,
    pub pas: i32,
    pub dri: i32,
    pub def: i32,
    pub phy: i32,
}
