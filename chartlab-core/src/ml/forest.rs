//! Random forest of decision stumps.
//!
//! Each stump splits one randomly chosen feature at a random threshold between
//! its observed min and max, and predicts the majority label on either side.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::features::{Feature, FeatureVector};

pub const DEFAULT_TREE_COUNT: usize = 25;

/// Threshold spread below which a feature is treated as constant.
const FLAT_RANGE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionStump {
    pub feature: Feature,
    pub threshold: f64,
    /// +1 or -1.
    pub above_label: i8,
    pub below_label: i8,
}

impl DecisionStump {
    pub fn predict(&self, vector: &FeatureVector) -> i8 {
        if vector.get(self.feature) >= self.threshold {
            self.above_label
        } else {
            self.below_label
        }
    }

    fn fit(vectors: &[FeatureVector], feature: Feature, rng: &mut StdRng) -> Self {
        let (min, max) = vectors
            .iter()
            .map(|v| v.get(feature))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });
        let threshold = if (max - min).abs() < FLAT_RANGE {
            min
        } else {
            min + rng.gen::<f64>() * (max - min)
        };

        let above = vectors.iter().filter(|v| v.get(feature) >= threshold);
        let below = vectors.iter().filter(|v| v.get(feature) < threshold);

        Self {
            feature,
            threshold,
            above_label: majority_label(above),
            below_label: majority_label(below),
        }
    }
}

/// +1 unless bearish labels strictly outnumber bullish ones.
fn majority_label<'a>(vectors: impl Iterator<Item = &'a FeatureVector>) -> i8 {
    let (bullish, bearish) = vectors.fold((0usize, 0usize), |(bull, bear), v| {
        if v.label.is_bullish() {
            (bull + 1, bear)
        } else {
            (bull, bear + 1)
        }
    });
    if bullish >= bearish {
        1
    } else {
        -1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StumpForest {
    trees: Vec<DecisionStump>,
}

impl StumpForest {
    /// Train `tree_count` stumps from a seeded generator. An empty training
    /// set gives an empty forest.
    pub fn train(vectors: &[FeatureVector], tree_count: usize, seed: u64) -> Self {
        if vectors.is_empty() {
            return Self::default();
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let trees = (0..tree_count)
            .map(|_| {
                let feature = Feature::ALL[rng.gen_range(0..Feature::ALL.len())];
                DecisionStump::fit(vectors, feature, &mut rng)
            })
            .collect();
        Self { trees }
    }

    pub fn from_trees(trees: Vec<DecisionStump>) -> Self {
        Self { trees }
    }

    pub fn trees(&self) -> &[DecisionStump] {
        &self.trees
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Fraction of stumps voting non-negative; 0.5 for an empty forest.
    pub fn predict_probability(&self, vector: &FeatureVector) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }
        let bullish = self.trees.iter().filter(|t| t.predict(vector) >= 0).count();
        bullish as f64 / self.trees.len() as f64
    }
}
