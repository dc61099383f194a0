//! Logistic pronounceability model.
//!
//! - Persisted parameters (`ModelParameters`)
//! - Inference and difficulty buckets (`Classifier`, `Category`)
//! - Stochastic gradient descent training (`Trainer`)

/// Weights, bias and standardization statistics, with versioned
/// binary persistence.
pub mod params;

/// Sigmoid scoring, category buckets and feature importance.
pub mod classifier;

/// Gradient-descent trainer and the curated example table.
pub mod trainer;
