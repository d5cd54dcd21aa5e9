//! Model Loader - read artifacts once per process
//!
//! Reads the booster and the feature-name list from the model directory.
//! There is no retry and no alternate location. The feature list is not
//! checked against the model; a mismatch only shows up at prediction time.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};

use super::booster::{Booster, ModelFormatError};
use super::inference::{ModelMetadata, SalesModel};
use crate::constants::{FEATURE_NAMES_FILE_NAME, MODEL_FILE_NAME};
use crate::logic::features::layout::{unknown_features, LayoutInfo};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error(
        "Model or feature files not found. Please ensure the following files exist:\n\
         1. `{model_path}`\n\
         2. `{features_path}`\n\
         Run the training notebook to generate them."
    )]
    ArtifactsMissing {
        model_path: String,
        features_path: String,
    },

    #[error("failed to read `{path}`: {reason}")]
    Io { path: String, reason: String },

    #[error("invalid model artifact `{path}`: {source}")]
    InvalidModel {
        path: String,
        source: ModelFormatError,
    },

    #[error("invalid feature list `{path}`: {reason}")]
    InvalidFeatureNames { path: String, reason: String },
}

// ============================================================================
// STATE
// ============================================================================

/// Process-wide load result (success or failure), set on first use
static MODEL: OnceCell<Result<Arc<SalesModel>, LoadError>> = OnceCell::new();

/// Load once and memoize.
///
/// The first call decides the directory; later calls return the cached
/// result whatever `model_dir` they pass.
pub fn load_cached(model_dir: &Path) -> Result<Arc<SalesModel>, LoadError> {
    MODEL
        .get_or_init(|| load(model_dir).map(Arc::new))
        .clone()
}

// ============================================================================
// LOADING
// ============================================================================

/// Read both artifacts, returning (model, feature_names)
pub fn load_model_and_features(model_dir: &Path) -> Result<(Booster, Vec<String>), LoadError> {
    read_artifacts(model_dir).map(|(booster, feature_names, _)| (booster, feature_names))
}

/// Parse both artifacts; the checksum covers the exact model bytes parsed
fn read_artifacts(model_dir: &Path) -> Result<(Booster, Vec<String>, String), LoadError> {
    let model_path = model_dir.join(MODEL_FILE_NAME);
    let features_path = model_dir.join(FEATURE_NAMES_FILE_NAME);

    let model_bytes = read_artifact(&model_path, &features_path, &model_path)?;
    let feature_bytes = read_artifact(&model_path, &features_path, &features_path)?;

    let model_json = std::str::from_utf8(&model_bytes).map_err(|e| LoadError::InvalidModel {
        path: model_path.display().to_string(),
        source: ModelFormatError::Json(e.to_string()),
    })?;

    let booster = Booster::from_json(model_json).map_err(|source| LoadError::InvalidModel {
        path: model_path.display().to_string(),
        source,
    })?;

    let feature_names: Vec<String> =
        serde_json::from_slice(&feature_bytes).map_err(|e| LoadError::InvalidFeatureNames {
            path: features_path.display().to_string(),
            reason: e.to_string(),
        })?;

    if feature_names.is_empty() {
        return Err(LoadError::InvalidFeatureNames {
            path: features_path.display().to_string(),
            reason: "empty feature list".to_string(),
        });
    }

    let checksum = hex::encode(Sha256::digest(&model_bytes));

    Ok((booster, feature_names, checksum))
}

/// Read both artifacts and wrap them with metadata
pub fn load(model_dir: &Path) -> Result<SalesModel, LoadError> {
    let model_path = model_dir.join(MODEL_FILE_NAME);
    let features_path = model_dir.join(FEATURE_NAMES_FILE_NAME);

    tracing::info!("Loading model from: {}", model_path.display());

    let (booster, feature_names, checksum) = read_artifacts(model_dir)?;

    let unknown = unknown_features(&feature_names);
    if !unknown.is_empty() {
        tracing::warn!(
            ?unknown,
            "feature list names columns the transformer does not produce; predictions will fail"
        );
    }

    let metadata = ModelMetadata {
        model_path: model_path.display().to_string(),
        features_path: features_path.display().to_string(),
        checksum,
        xgboost_version: booster.version().to_string(),
        objective: booster.objective().to_string(),
        link: booster.link(),
        base_score: booster.base_score(),
        tree_count: booster.tree_count(),
        node_count: booster.node_count(),
        num_feature: booster.num_feature(),
        feature_names: feature_names.clone(),
        layout: LayoutInfo::current(),
        loaded_at: chrono::Utc::now(),
    };

    tracing::info!(
        trees = metadata.tree_count,
        objective = %metadata.objective,
        features = feature_names.len(),
        "Model loaded successfully"
    );

    Ok(SalesModel::new(booster, feature_names, metadata))
}

/// Read one artifact; a missing file reports both expected paths
fn read_artifact(model_path: &Path, features_path: &Path, path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::ArtifactsMissing {
            model_path: model_path.display().to_string(),
            features_path: features_path.display().to_string(),
        },
        _ => LoadError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        },
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::Budgets;
    use crate::logic::model::fixtures;
    use tempfile::tempdir;

    #[test]
    fn test_load_success() {
        let dir = tempdir().unwrap();
        fixtures::write_artifacts(dir.path());

        let (booster, names) = load_model_and_features(dir.path()).unwrap();
        assert_eq!(booster.tree_count(), 2);
        assert_eq!(names.len(), 7);
        assert_eq!(names[0], "TV");

        let model = load(dir.path()).unwrap();
        let meta = model.metadata();
        let bytes = std::fs::read(dir.path().join(MODEL_FILE_NAME)).unwrap();
        assert_eq!(meta.checksum, hex::encode(Sha256::digest(&bytes)));
        assert!(meta.model_path.ends_with("optimized_xgb_model.json"));
        assert_eq!(meta.feature_names, names);
    }

    #[test]
    fn test_missing_artifacts_names_both_paths() {
        let dir = tempdir().unwrap();

        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::ArtifactsMissing { .. }));

        let message = err.to_string();
        let model_path = dir.path().join("optimized_xgb_model.json");
        let features_path = dir.path().join("feature_names.json");
        assert!(message.contains(&model_path.display().to_string()));
        assert!(message.contains(&features_path.display().to_string()));
    }

    #[test]
    fn test_missing_feature_list_only() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(MODEL_FILE_NAME), fixtures::model_json()).unwrap();

        let err = load_model_and_features(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::ArtifactsMissing { .. }));
        assert!(err.to_string().contains("feature_names.json"));
    }

    #[test]
    fn test_invalid_artifacts() {
        let dir = tempdir().unwrap();
        fixtures::write_artifacts(dir.path());
        std::fs::write(dir.path().join(MODEL_FILE_NAME), "{\"learner\": 1}").unwrap();
        assert!(matches!(load(dir.path()), Err(LoadError::InvalidModel { .. })));

        fixtures::write_artifacts(dir.path());
        std::fs::write(dir.path().join(FEATURE_NAMES_FILE_NAME), "{\"TV\": 0}").unwrap();
        assert!(matches!(load(dir.path()), Err(LoadError::InvalidFeatureNames { .. })));

        std::fs::write(dir.path().join(FEATURE_NAMES_FILE_NAME), "[]").unwrap();
        assert!(matches!(load(dir.path()), Err(LoadError::InvalidFeatureNames { .. })));
    }

    #[test]
    fn test_mismatched_feature_list_loads_but_fails_at_predict() {
        let dir = tempdir().unwrap();
        fixtures::write_artifacts(dir.path());
        std::fs::write(dir.path().join(FEATURE_NAMES_FILE_NAME), "[\"TV\", \"Newspaper\"]").unwrap();

        let model = load(dir.path()).unwrap();
        assert!(model.predict(&Budgets::new(1.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn test_cached_load_is_memoized() {
        let dir = tempdir().unwrap();
        fixtures::write_artifacts(dir.path());

        let first = load_cached(dir.path()).unwrap();
        let empty = tempdir().unwrap();
        let second = load_cached(empty.path()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }
}
