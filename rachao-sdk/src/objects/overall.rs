//! The derived overall rating and the payload that carries it through the
//! message channel.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::attributes::Attributes;
use super::card::Card;

/// Routing-key prefix for every overall payload.
pub const ROUTING_KEY_PREFIX: &str = "card";

/// Routing key under which every payload concerning `id_play` is published.
///
/// Always `"card." + id_play` in hyphenated lowercase form.
pub fn routing_key_for_player(id_play: Uuid) -> String {
    format!("{ROUTING_KEY_PREFIX}.{id_play}")
}

/// The single derived rating record of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overall {
    pub id: Uuid,
    pub id_play: Uuid,
    pub overall: i32,
}

/// Unit of work on the overall channel: a card plus the weights of the
/// owning player's position.
///
/// Unknown fields are ignored when decoding. Every listed field is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallPayload {
    pub card: Card,
    pub attributes: Attributes,
}

impl OverallPayload {
    pub fn player_id(&self) -> Uuid {
        self.card.id_play
    }

    pub fn routing_key(&self) -> String {
        routing_key_for_player(self.card.id_play)
    }
}

/// What the overall store actually persists for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallRequest {
    pub id_play: Uuid,
    pub overall: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "card": {
            "id": "6b0f5bb1-4c8e-4b53-9a3e-2f4f0c8f2a11",
            "id_play": "0d5a3f4e-8a2b-4c1d-9e6f-7a8b9c0d1e2f",
            "pac": 80, "sho": 70, "pas": 60, "dri": 75, "def": 40, "phy": 65
        },
        "attributes": {
            "id": 3, "id_position": 9,
            "pac": 2, "sho": 3, "pas": 1, "dri": 2, "def": 0, "phy": 1
        }
    }"#;

    #[test]
    fn test_payload_decodes_wire_shape() {
        let payload: OverallPayload = serde_json::from_str(PAYLOAD).unwrap();
        assert_eq!(payload.card.pac, 80);
        assert_eq!(payload.attributes.id_position, 9);
        assert_eq!(
            payload.player_id().to_string(),
            "0d5a3f4e-8a2b-4c1d-9e6f-7a8b9c0d1e2f"
        );
    }

    #[test]
    fn test_payload_ignores_unknown_fields() {
        let json = r#"{
            "version": 2,
            "card": {
                "id": "6b0f5bb1-4c8e-4b53-9a3e-2f4f0c8f2a11",
                "id_play": "0d5a3f4e-8a2b-4c1d-9e6f-7a8b9c0d1e2f",
                "pac": 1, "sho": 2, "pas": 3, "dri": 4, "def": 5, "phy": 6,
                "rarity": "gold"
            },
            "attributes": {
                "id": 1, "id_position": 1,
                "pac": 1, "sho": 1, "pas": 1, "dri": 1, "def": 1, "phy": 1
            }
        }"#;
        let payload: OverallPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.card.scores(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_payload_rejects_missing_field() {
        let json = r#"{
            "card": {
                "id": "6b0f5bb1-4c8e-4b53-9a3e-2f4f0c8f2a11",
                "id_play": "0d5a3f4e-8a2b-4c1d-9e6f-7a8b9c0d1e2f",
                "pac": 1, "sho": 2, "pas": 3, "dri": 4, "def": 5
            },
            "attributes": {
                "id": 1, "id_position": 1,
                "pac": 1, "sho": 1, "pas": 1, "dri": 1, "def": 1, "phy": 1
            }
        }"#;
        assert!(serde_json::from_str::<OverallPayload>(json).is_err());
        assert!(serde_json::from_str::<OverallPayload>(r#"{"card": null}"#).is_err());
    }

    #[test]
    fn test_routing_key_is_deterministic() {
        let id_play = Uuid::parse_str("0d5a3f4e-8a2b-4c1d-9e6f-7a8b9c0d1e2f").unwrap();
        let first = routing_key_for_player(id_play);
        assert_eq!(first, "card.0d5a3f4e-8a2b-4c1d-9e6f-7a8b9c0d1e2f");
        assert_eq!(first, routing_key_for_player(id_play));

        let payload: OverallPayload = serde_json::from_str(PAYLOAD).unwrap();
        assert_eq!(payload.routing_key(), routing_key_for_player(payload.player_id()));
    }
}
