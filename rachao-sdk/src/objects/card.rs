//! Player cards and the card/player joined view.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::player::Player;

/// A player's current skill sub-scores.
///
/// The six fields are observed in the 0..=99 range but no range is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub id_play: Uuid,
    pub pac: i32,
    pub sho: i32,
    pub pas: i32,
    pub dri: i32,
    pub def: i32,
    pub phy: i32,
}

impl Card {
    /// The six sub-scores in `pac, sho, pas, dri, def, phy` order.
    pub fn scores(&self) -> [i32; 6] {
        [self.pac, self.sho, self.pas, self.dri, self.def, self.phy]
    }
}

/// Body of `POST /card/{id_play}` and `PUT /card/{id_play}`.
///
/// Missing fields default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardRequest {
    pub pac: i32,
    pub sho: i32,
    pub pas: i32,
    pub dri: i32,
    pub def: i32,
    pub phy: i32,
}

impl CardRequest {
    /// An update body with every score at zero carries no information.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A player together with their card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPlayer {
    pub play: Player,
    pub card: Card,
}
