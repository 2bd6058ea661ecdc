//! k-nearest-neighbour forecast of the next move.

use serde::{Deserialize, Serialize};

use super::features::FeatureVector;

pub const DEFAULT_NEIGHBORS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnnPrediction {
    pub direction: MoveDirection,
    /// Winning vote share, in `[0.5, 1]`.
    pub confidence: f64,
    pub explanation: String,
}

/// Vote among the `neighbors` training vectors closest to `latest`.
///
/// `None` when `neighbors` is 0, there is no query vector, or the training
/// set has fewer than `neighbors` entries. Equal distances keep training order.
pub fn predict_next_move(
    training: &[FeatureVector],
    latest: Option<&FeatureVector>,
    neighbors: usize,
) -> Option<KnnPrediction> {
    let latest = latest?;
    if neighbors == 0 || training.len() < neighbors {
        return None;
    }

    let mut ranked: Vec<(f64, &FeatureVector)> =
        training.iter().map(|v| (v.distance(latest), v)).collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    let bullish = ranked
        .iter()
        .take(neighbors)
        .filter(|(_, v)| v.label.is_bullish())
        .count();
    let bearish = neighbors - bullish;

    let direction = if bullish >= bearish {
        MoveDirection::Bullish
    } else {
        MoveDirection::Bearish
    };

    Some(KnnPrediction {
        direction,
        confidence: bullish.max(bearish) as f64 / neighbors as f64,
        explanation: format!(
            "Based on the {neighbors} most similar situations, {bullish} favored upward movement."
        ),
    })
}
