//! Features Module - Feature Engineering
//!
//! Turns raw advertising budgets into the model's input features.

pub mod layout;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::LayoutInfo;
pub use vector::{engineer, Budgets, FeatureEntry, UnknownFeatureError};
