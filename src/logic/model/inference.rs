//! Inference Engine - budgets in, predicted sales out
//!
//! Wraps the loaded booster together with the feature-name list it was
//! trained on. Every prediction is a single row; the row is laid out in the
//! model's column order before scoring.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::booster::{Booster, Link};
use crate::logic::features::{engineer, Budgets, FeatureEntry, LayoutInfo, UnknownFeatureError};

// ============================================================================
// ERRORS
// ============================================================================

/// Model and input row disagree on the schema
#[derive(Debug, Clone, thiserror::Error)]
pub enum InferenceError {
    #[error(transparent)]
    UnknownFeature(#[from] UnknownFeatureError),

    #[error("tree {tree} splits on column {split_index} but the row has {row_len} columns")]
    FeatureOutOfRange {
        tree: usize,
        split_index: usize,
        row_len: usize,
    },

    #[error("tree {tree} did not reach a leaf")]
    TreeCycle { tree: usize },
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata, fixed at load time
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub features_path: String,
    /// SHA-256 of the model file
    pub checksum: String,
    pub xgboost_version: String,
    pub objective: String,
    pub link: Link,
    pub base_score: f64,
    pub tree_count: usize,
    pub node_count: usize,
    pub num_feature: usize,
    pub feature_names: Vec<String>,
    pub layout: LayoutInfo,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Prediction output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub budgets: Budgets,
    pub prediction: f64,
    /// e.g. `$12,345.67`
    pub formatted: String,
    /// Features exactly as sent to the model, in model column order
    pub features: Vec<FeatureEntry>,
    pub inference_time_us: u64,
}

/// One bar of the importance chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InferenceStats {
    pub inference_count: u64,
    pub avg_latency_us: f64,
}

// ============================================================================
// SALES MODEL
// ============================================================================

/// Loaded booster plus its expected column order
#[derive(Debug)]
pub struct SalesModel {
    booster: Booster,
    feature_names: Vec<String>,
    metadata: ModelMetadata,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl SalesModel {
    pub fn new(booster: Booster, feature_names: Vec<String>, metadata: ModelMetadata) -> Self {
        Self {
            booster,
            feature_names,
            metadata,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    /// Engineer features, order them for the model, score one row
    pub fn predict(&self, budgets: &Budgets) -> Result<PredictionResult, InferenceError> {
        let start_time = Instant::now();

        let row = engineer(budgets).arrange(&self.feature_names)?;
        let prediction = self.booster.predict_row(row.as_slice())?;

        let inference_time = start_time.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(inference_time, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            tv = budgets.tv,
            radio = budgets.radio,
            newspaper = budgets.newspaper,
            prediction,
            inference_time_us = inference_time,
            "prediction served"
        );

        Ok(PredictionResult {
            budgets: *budgets,
            prediction,
            formatted: format_currency(prediction),
            features: row.entries(),
            inference_time_us: inference_time,
        })
    }

    /// Gain importance per feature, highest first
    pub fn feature_importances(&self) -> Vec<FeatureImportance> {
        let scores = self.booster.gain_importance(self.feature_names.len());

        let mut importances: Vec<FeatureImportance> = self
            .feature_names
            .iter()
            .zip(scores)
            .map(|(name, importance)| FeatureImportance {
                feature: name.clone(),
                importance,
            })
            .collect();

        importances.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        importances
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn stats(&self) -> InferenceStats {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);

        InferenceStats {
            inference_count: count,
            avg_latency_us: if count > 0 { sum as f64 / count as f64 } else { 0.0 },
        }
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

/// `$` with thousands separators and two decimals; negatives as `-$1,234.50`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // -0.004 rounds to 0.00 and should not print a sign
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac_part)
}

// ============================================================================
// TESTS
// ============================================================================
