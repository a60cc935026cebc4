//! HTTP surface: `/health`, `/predict`, `/predict/batch` and `/metrics`

pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::metrics::ScoringMetrics;
use crate::scoring::Scorer;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scorer: Scorer,
    pub metrics: Arc<ScoringMetrics>,
}

impl AppState {
    pub fn new(scorer: Scorer) -> Self {
        Self {
            scorer,
            metrics: Arc::new(ScoringMetrics::new()),
        }
    }
}

/// Build the router. Every origin is allowed.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/predict", post(handlers::predict))
        .route("/predict/batch", post(handlers::predict_batch))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
