//! Prediction request/response models

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{BudgetBounds, NEWSPAPER_BOUNDS, RADIO_BOUNDS, TV_BOUNDS};
use crate::logic::features::{Budgets, FeatureEntry, LayoutInfo};
use crate::logic::model::{InferenceStats, ModelMetadata};

/// Budgets as submitted by the UI or an API client.
///
/// Missing channels fall back to the slider defaults.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct PredictRequest {
    #[serde(default = "default_tv")]
    #[validate(range(min = 0.0, max = 300.0))]
    pub tv: f64,

    #[serde(default = "default_radio")]
    #[validate(range(min = 0.0, max = 50.0))]
    pub radio: f64,

    #[serde(default = "default_newspaper")]
    #[validate(range(min = 0.0, max = 120.0))]
    pub newspaper: f64,
}

fn default_tv() -> f64 {
    TV_BOUNDS.default
}

fn default_radio() -> f64 {
    RADIO_BOUNDS.default
}

fn default_newspaper() -> f64 {
    NEWSPAPER_BOUNDS.default
}

impl From<PredictRequest> for Budgets {
    fn from(req: PredictRequest) -> Self {
        Budgets::new(req.tv, req.radio, req.newspaper)
    }
}

#[derive(Debug, Serialize)]
pub struct FeaturesResponse {
    pub budgets: Budgets,
    pub total_spend: f64,
    pub features: Vec<FeatureEntry>,
    pub layout: LayoutInfo,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub metadata: ModelMetadata,
    pub stats: InferenceStats,
}

/// Slider configuration handed to the page
#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub tv: BudgetBounds,
    pub radio: BudgetBounds,
    pub newspaper: BudgetBounds,
    /// Loader error shown instead of the prediction controls
    pub model_error: Option<String>,
}

impl UiConfig {
    pub fn new(model_error: Option<String>) -> Self {
        Self {
            tv: TV_BOUNDS,
            radio: RADIO_BOUNDS,
            newspaper: NEWSPAPER_BOUNDS,
            model_error,
        }
    }
}
