//! Feature Vector - budget transform and model column ordering
//!
//! `engineer` turns three raw budgets into the derived features. The result
//! is arranged into whatever column order the loaded model expects with
//! `EngineeredFeatures::arrange`.

use serde::{Deserialize, Serialize};

use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT};

// ============================================================================
// INPUT
// ============================================================================

/// Advertising spend per channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Budgets {
    pub tv: f64,
    pub radio: f64,
    pub newspaper: f64,
}

impl Budgets {
    pub fn new(tv: f64, radio: f64, newspaper: f64) -> Self {
        Self { tv, radio, newspaper }
    }

    pub fn total(&self) -> f64 {
        self.tv + self.radio + self.newspaper
    }
}

// ============================================================================
// ENGINEERED FEATURES
// ============================================================================

/// Derived features in canonical layout order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    pub values: [f64; FEATURE_COUNT],
}

/// Compute every derived feature from the raw budgets.
///
/// Share features are 0 when total spend is 0. Newspaper only enters
/// through the share denominator.
pub fn engineer(budgets: &Budgets) -> EngineeredFeatures {
    let Budgets { tv, radio, .. } = *budgets;
    let total = budgets.total();

    let share = |part: f64| if total != 0.0 { part / total } else { 0.0 };

    EngineeredFeatures {
        values: [
            tv,
            radio,
            tv * radio,
            tv * tv,
            radio * radio,
            share(tv),
            share(radio),
        ],
    }
}

impl EngineeredFeatures {
    /// Get feature by name
    pub fn get(&self, name: &str) -> Option<f64> {
        super::layout::feature_index(name).map(|i| self.values[i])
    }

    /// Reorder into the model's column order.
    ///
    /// Every requested name must be one this transformer produces.
    pub fn arrange(&self, order: &[String]) -> Result<FeatureVector, UnknownFeatureError> {
        let mut values = Vec::with_capacity(order.len());

        for name in order {
            let value = self
                .get(name)
                .ok_or_else(|| UnknownFeatureError(name.clone()))?;
            values.push(value);
        }

        Ok(FeatureVector {
            names: order.to_vec(),
            values,
        })
    }

    /// Canonical-order vector, used when no model order is available
    pub fn to_canonical(&self) -> FeatureVector {
        FeatureVector {
            names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            values: self.values.to_vec(),
        }
    }
}

/// Requested column the transformer cannot produce
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("model expects feature `{0}` which is not engineered from budgets")]
pub struct UnknownFeatureError(pub String);

// ============================================================================
// ORDERED VECTOR
// ============================================================================

/// Single model input row with its column names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub names: Vec<String>,
    pub values: Vec<f64>,
}

/// One row of the "engineered features" table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub feature: String,
    pub value: f64,
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Table rows in column order
    pub fn entries(&self) -> Vec<FeatureEntry> {
        self.names
            .iter()
            .zip(self.values.iter())
            .map(|(name, value)| FeatureEntry {
                feature: name.clone(),
                value: *value,
            })
            .collect()
    }
}
