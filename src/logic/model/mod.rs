//! Model Module - XGBoost inference
//!
//! Loading, tree-ensemble scoring and importance reporting.

pub mod booster;
pub mod inference;
pub mod loader;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export common types
pub use inference::{FeatureImportance, InferenceError, InferenceStats, ModelMetadata, PredictionResult, SalesModel};
pub use loader::{load_cached, LoadError};
