//! Row types and the `Processor` queries that read and write them.

pub mod attributes;
pub mod card;
pub mod card_player;
pub mod modality;
pub mod nation;
pub mod overall;
pub mod photo;
pub mod player;
pub mod position;
