//! The overall rating of a card.
//!
//! `overall = round(Σ score_i × weight_i / Σ weight_i)` over the six skills,
//! where the weights are the attribute set of the player's position.
//! Negative weights count as zero. A position whose weights are all zero
//! rates as the plain mean of the six scores. The result is clamped to
//! `0..=MAX_OVERALL`.

use rachao_sdk::objects::{Attributes, Card, OverallPayload, OverallRequest};

pub const MAX_OVERALL: i32 = 99;

pub fn overall_rating(card: &Card, attributes: &Attributes) -> i32 {
    let scores = card.scores().map(i64::from);
    let weights = attributes.weights().map(|w| i64::from(w.max(0)));

    let weight_sum: i64 = weights.iter().sum();
    let (numerator, denominator) = if weight_sum == 0 {
        (scores.iter().sum::<i64>(), scores.len() as i64)
    } else {
        let weighted: i64 = scores.iter().zip(weights.iter()).map(|(s, w)| s * w).sum();
        (weighted, weight_sum)
    };

    let rating = div_round_half_away(numerator, denominator);
    rating.clamp(0, i64::from(MAX_OVERALL)) as i32
}

fn div_round_half_away(numerator: i64, denominator: i64) -> i64 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

/// The record the overall store persists for `payload`.
pub fn overall_request(payload: &OverallPayload) -> OverallRequest {
    OverallRequest {
        id_play: payload.player_id(),
        overall: overall_rating(&payload.card, &payload.attributes),
    }
}
