//! Central Configuration Constants
//!
//! Single source of truth for artifact names and budget slider bounds.

/// Default directory holding the trained model artifacts
pub const DEFAULT_MODEL_DIR: &str = "model";

/// Serialized XGBoost booster (native JSON format)
pub const MODEL_FILE_NAME: &str = "optimized_xgb_model.json";

/// Ordered feature names the model was trained on
pub const FEATURE_NAMES_FILE_NAME: &str = "feature_names.json";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8501;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Advanced Sales Predictor";

// ============================================
// Budget bounds (UI sliders + API validation)
// ============================================

/// Inclusive range, default and step of one advertising channel slider
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct BudgetBounds {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

pub const TV_BOUNDS: BudgetBounds = BudgetBounds { min: 0.0, max: 300.0, default: 150.0, step: 5.0 };

pub const RADIO_BOUNDS: BudgetBounds = BudgetBounds { min: 0.0, max: 50.0, default: 25.0, step: 1.0 };

pub const NEWSPAPER_BOUNDS: BudgetBounds = BudgetBounds { min: 0.0, max: 120.0, default: 10.0, step: 1.0 };
