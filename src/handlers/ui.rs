//! Single-page UI

use axum::{extract::State, response::Html};

use crate::models::UiConfig;
use crate::{AppResult, AppState};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Placeholder in the page replaced by the slider/model configuration
const CONFIG_PLACEHOLDER: &str = "__APP_CONFIG__";

pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let model_error = state.model.as_ref().err().map(|e| e.to_string());
    let config = serde_json::to_string(&UiConfig::new(model_error))?;

    Ok(Html(render(&config)))
}

/// `</` inside the inlined JSON would end the script element early
fn render(config_json: &str) -> String {
    INDEX_HTML.replace(CONFIG_PLACEHOLDER, &config_json.replace("</", "<\\/"))
}
