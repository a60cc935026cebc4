//! Fraud Scoring Service - Main Entry Point
//!
//! Loads the classifier once, then serves `/health`, `/predict`,
//! `/predict/batch` and `/metrics` over HTTP.

use anyhow::{Context, Result};
use fraud_scoring_service::{
    api::{build_router, AppState},
    config::{AppConfig, LogFormat, LoggingConfig},
    models::{Classifier, OnnxClassifier},
    scoring::Scorer,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_tracing(&config.logging)?;

    info!("Starting Fraud Scoring Service");
    info!(
        model_path = %config.model.path,
        onnx_threads = config.model.onnx_threads,
        transaction_types = ?config.model.transaction_types,
        "Configuration loaded successfully"
    );

    // A missing or broken model keeps the service up in degraded mode
    let classifier: Option<Arc<dyn Classifier>> = match OnnxClassifier::new(&config.model) {
        Ok(classifier) => {
            info!(model = classifier.name(), "Model loaded successfully");
            Some(Arc::new(classifier))
        }
        Err(e) => {
            error!(error = %format!("{:#}", e), "Error loading model");
            None
        }
    };

    let state = AppState::new(Scorer::new(classifier));
    let app = build_router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!(
            "fraud_scoring_service={level},tower_http={level}",
            level = logging.level
        ))
    })?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match logging.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }

    Ok(())
}
