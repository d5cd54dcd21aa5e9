//! Model info handlers

use axum::{extract::State, Json};

use crate::logic::model::FeatureImportance;
use crate::models::ModelInfoResponse;
use crate::{AppResult, AppState};

/// Loaded model metadata and inference stats
pub async fn info(State(state): State<AppState>) -> AppResult<Json<ModelInfoResponse>> {
    let model = state.model()?;

    Ok(Json(ModelInfoResponse {
        metadata: model.metadata().clone(),
        stats: model.stats(),
    }))
}

/// Feature importances, highest first
pub async fn importance(State(state): State<AppState>) -> AppResult<Json<Vec<FeatureImportance>>> {
    let model = state.model()?;
    Ok(Json(model.feature_importances()))
}
