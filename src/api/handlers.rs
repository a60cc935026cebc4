use super::error::ApiError;
use super::AppState;
use crate::error::ScoringError;
use crate::types::verdict::{BatchOutcome, Verdict};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::error;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
}

#[derive(Serialize)]
pub struct BatchResponse {
    results: Vec<BatchOutcome>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.scorer.model_loaded(),
    })
}

pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Verdict>, ApiError> {
    let start = Instant::now();
    let payload = parse_body(&body);

    match state.scorer.score(payload.as_ref()) {
        Ok(verdict) => {
            state.metrics.record_prediction(&verdict, start.elapsed());
            Ok(Json(verdict))
        }
        Err(e) => Err(reject(&state, "/predict", &e, ApiError::from_single(&e))),
    }
}

pub async fn predict_batch(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BatchResponse>, ApiError> {
    let start = Instant::now();
    let payload = parse_body(&body);

    match state.scorer.score_batch(payload.as_ref()) {
        Ok(results) => {
            state.metrics.record_batch(&results, start.elapsed());
            Ok(Json(BatchResponse { results }))
        }
        Err(e) => Err(reject(&state, "/predict/batch", &e, ApiError::from_batch(&e))),
    }
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.metrics.render_prometheus(),
    )
}

/// Empty or unparseable bodies are treated as absent.
fn parse_body(body: &Bytes) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice(body).ok()
}

fn reject(state: &AppState, route: &'static str, err: &ScoringError, api: ApiError) -> ApiError {
    state.metrics.record_error(err.kind());
    error!(
        route,
        kind = err.kind(),
        status = api.status.as_u16(),
        error = %api.message,
        "Request failed"
    );
    api
}
