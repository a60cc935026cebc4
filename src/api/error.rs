use crate::error::ScoringError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// An error rendered as `{"error": message}` with an HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Mapping used by `POST /predict`
    pub fn from_single(err: &ScoringError) -> Self {
        match err {
            ScoringError::ModelUnavailable | ScoringError::MissingFields(_) => {
                Self::new(status_of(err), err.to_string())
            }
            ScoringError::MissingBody => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            ScoringError::InvalidNumericField { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                format!("Invalid data format: {}", err),
            ),
            _ => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Prediction failed: {}", err),
            ),
        }
    }

    /// Mapping used by `POST /predict/batch`
    pub fn from_batch(err: &ScoringError) -> Self {
        match err {
            ScoringError::ModelUnavailable | ScoringError::NoTransactions => {
                Self::new(status_of(err), err.to_string())
            }
            _ => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Batch prediction failed: {}", err),
            ),
        }
    }

    fn new(status: StatusCode, message: String) -> Self {
        Self { status, message }
    }
}

fn status_of(err: &ScoringError) -> StatusCode {
    match err {
        ScoringError::ModelUnavailable
        | ScoringError::ClassifierInvocation(_)
        | ScoringError::BatchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ScoringError::MissingBody
        | ScoringError::MissingFields(_)
        | ScoringError::InvalidNumericField { .. }
        | ScoringError::NoTransactions => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}
