//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_MODEL_DIR, DEFAULT_PORT, FEATURE_NAMES_FILE_NAME, MODEL_FILE_NAME};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Directory holding the model artifacts
    pub model_dir: PathBuf,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_dir: env::var("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Path of the serialized booster
    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(MODEL_FILE_NAME)
    }

    /// Path of the feature-name list
    pub fn feature_names_path(&self) -> PathBuf {
        self.model_dir.join(FEATURE_NAMES_FILE_NAME)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths_use_model_dir() {
        let config = Config {
            model_dir: PathBuf::from("artifacts"),
            ..Default::default()
        };

        assert_eq!(config.model_path(), PathBuf::from("artifacts").join("optimized_xgb_model.json"));
        assert_eq!(config.feature_names_path(), PathBuf::from("artifacts").join("feature_names.json"));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8501);
        assert_eq!(config.model_dir, PathBuf::from("model"));
        assert!(!config.is_production());
    }
}
