//! Fraud Scoring Service Library
//!
//! Scores payment transactions with a pre-trained binary classifier and
//! serves the verdicts over HTTP, one transaction at a time or in batches.

pub mod api;
pub mod config;
pub mod decision;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod scoring;
pub mod types;

pub use api::{build_router, AppState};
pub use config::AppConfig;
pub use error::ScoringError;
pub use feature_extractor::{FeatureExtractor, FeatureVector};
pub use models::{Classifier, OnnxClassifier};
pub use scoring::Scorer;
pub use types::{transaction::TransactionRecord, verdict::Verdict};
