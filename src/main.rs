//! Sales Predictor Server
//!
//! Predicts sales revenue from TV / Radio / Newspaper advertising budgets
//! with a trained XGBoost model.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      SALES PREDICTOR                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  sliders ──► POST /api/v1/predict                            │
//! │                  │                                           │
//! │                  ▼                                           │
//! │  ┌──────────────────────┐   ┌──────────────────────────────┐ │
//! │  │  Feature transform   │──►│  Tree ensemble (loaded once) │ │
//! │  │  (budgets → 7 cols)  │   │  model/optimized_xgb_model   │ │
//! │  └──────────────────────┘   └──────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod constants;
mod error;
mod handlers;
mod logic;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logic::model::{LoadError, SalesModel};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    init_tracing(&config);

    tracing::info!("{} v{} starting...", constants::APP_NAME, constants::APP_VERSION);
    tracing::info!(
        "Model artifacts: {} / {}",
        config.model_path().display(),
        config.feature_names_path().display()
    );

    // Load model once for the process lifetime
    let model = logic::model::load_cached(&config.model_dir);
    if let Err(e) = &model {
        tracing::error!("Model not loaded - predictions disabled: {}", e);
    }

    let state = AppState {
        config: config.clone(),
        model,
    };

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing(config: &config::Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sales_predictor=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    /// Result of the one-time artifact load
    pub model: Result<Arc<SalesModel>, LoadError>,
}

impl AppState {
    /// Loaded model, or the loader error as a 503
    pub fn model(&self) -> AppResult<&SalesModel> {
        self.model.as_deref().map_err(|e| AppError::from(e.clone()))
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    tracing::debug!("Routes configured for model dir {}", state.config.model_dir.display());

    let api_routes = Router::new()
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/features", post(handlers::predict::features))
        .route("/api/v1/model", get(handlers::model::info))
        .route("/api/v1/model/importance", get(handlers::model::importance));

    Router::new()
        .route("/", get(handlers::ui::index))
        .route("/health", get(handlers::health::check))
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
