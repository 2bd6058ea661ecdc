//! Random-forest scoring of crossover signals.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::features::{build_vector_at_index, FeatureInputs, FeatureVector};
use super::forest::StumpForest;
use crate::domain::{SignalDirection, TradeSignal};

/// Training vectors needed before the filter is applied at all.
pub const MIN_TRAINING_VECTORS: usize = 10;

pub const NOTE_INSUFFICIENT_DATA: &str =
    "Not enough historical data to train the Random Forest filter.";
pub const NOTE_ALL_REJECTED: &str =
    "All signals were filtered out by the Random Forest classifier.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalFilterReport {
    pub original_signals: usize,
    pub accepted_signals: usize,
    pub rejected_signals: usize,
    /// Sum of scored confidences over the accepted count, which includes
    /// signals passed through without a score.
    pub average_confidence: f64,
    pub notes: Vec<String>,
    /// Rejected signals with the probability that rejected them.
    pub rejected: Vec<TradeSignal>,
}

impl SignalFilterReport {
    pub fn all_rejected(&self) -> bool {
        self.original_signals > 0 && self.accepted_signals == 0
    }
}

/// Keep Buy signals the forest rates bullish (p >= 0.5) and Sell signals it
/// rates bearish. Signals without a feature vector pass through unscored.
///
/// The input slice is left untouched; returned signals carry `confidence`.
pub fn filter_signals(
    signals: &[TradeSignal],
    inputs: &FeatureInputs<'_>,
    training: &[FeatureVector],
    tree_count: usize,
    seed: u64,
) -> (Vec<TradeSignal>, SignalFilterReport) {
    let mut report = SignalFilterReport::default();
    if signals.is_empty() {
        return (Vec::new(), report);
    }

    report.original_signals = signals.len();
    if training.len() < MIN_TRAINING_VECTORS {
        report.notes.push(NOTE_INSUFFICIENT_DATA.to_string());
        report.accepted_signals = signals.len();
        return (signals.to_vec(), report);
    }

    let forest = StumpForest::train(training, tree_count, seed);
    let mut accepted = Vec::with_capacity(signals.len());
    let mut confidence_sum = 0.0;

    for signal in signals {
        let Some(vector) = build_vector_at_index(inputs, signal.index) else {
            accepted.push(signal.clone());
            continue;
        };

        let probability = forest.predict_probability(&vector);
        let scored = TradeSignal {
            confidence: Some(probability),
            ..signal.clone()
        };
        let keep = match signal.direction {
            SignalDirection::Buy => probability >= 0.5,
            SignalDirection::Sell => probability < 0.5,
        };
        if keep {
            confidence_sum += probability;
            accepted.push(scored);
        } else {
            report.rejected.push(scored);
        }
    }

    report.accepted_signals = accepted.len();
    report.rejected_signals = report.rejected.len();
    if accepted.is_empty() {
        report.notes.push(NOTE_ALL_REJECTED.to_string());
    } else {
        report.average_confidence = confidence_sum / accepted.len() as f64;
    }

    debug!(
        original = report.original_signals,
        accepted = report.accepted_signals,
        rejected = report.rejected_signals,
        trees = forest.len(),
        "signals filtered"
    );
    (accepted, report)
}
