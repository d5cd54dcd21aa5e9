//! Domain logic: feature engineering and model inference

pub mod features;
pub mod model;
