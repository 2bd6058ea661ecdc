//! Model layer: feature vectors, a stump forest that scores crossover
//! signals, and a nearest-neighbour forecast of the next move.
//!
//! Everything here is deterministic given the training vectors and the seed.

pub mod features;
pub mod filter;
pub mod forest;
pub mod knn;

pub use features::{
    build_features, build_vector_at_index, Feature, FeatureInputs, FeatureVector, Label,
    DEFAULT_FUTURE_OFFSET,
};
pub use filter::{filter_signals, SignalFilterReport, MIN_TRAINING_VECTORS};
pub use forest::{DecisionStump, StumpForest, DEFAULT_TREE_COUNT};
pub use knn::{predict_next_move, KnnPrediction, MoveDirection, DEFAULT_NEIGHBORS};
