//! Prediction handlers

use axum::{extract::State, Json};
use validator::Validate;

use crate::logic::features::{engineer, Budgets, LayoutInfo};
use crate::logic::model::PredictionResult;
use crate::models::{FeaturesResponse, PredictRequest};
use crate::{AppResult, AppState};

/// Engineer features and score them with the loaded model
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> AppResult<Json<PredictionResult>> {
    req.validate()?;

    let model = state.model()?;
    let result = model.predict(&Budgets::from(req))?;

    Ok(Json(result))
}

/// Engineered features only; works without a model
pub async fn features(Json(req): Json<PredictRequest>) -> AppResult<Json<FeaturesResponse>> {
    req.validate()?;

    let budgets = Budgets::from(req);
    let features = engineer(&budgets).to_canonical().entries();

    Ok(Json(FeaturesResponse {
        budgets,
        total_spend: budgets.total(),
        features,
        layout: LayoutInfo::current(),
    }))
}
