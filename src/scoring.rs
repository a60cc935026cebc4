//! Single and batch scoring pipelines.
//!
//! validate → derive features → classify → decide. Nothing here knows about
//! HTTP; handlers map the returned errors onto status codes.

use crate::decision::{decide, DecisionMode};
use crate::error::ScoringError;
use crate::feature_extractor::{FeatureExtractor, FeatureVector};
use crate::models::Classifier;
use crate::types::transaction::TransactionRecord;
use crate::types::verdict::{BatchOutcome, Verdict};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Scores transactions against an optional, read-only classifier.
#[derive(Clone)]
pub struct Scorer {
    classifier: Option<Arc<dyn Classifier>>,
}

impl Scorer {
    pub fn new(classifier: Option<Arc<dyn Classifier>>) -> Self {
        Self { classifier }
    }

    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    fn classifier(&self) -> Result<&dyn Classifier, ScoringError> {
        self.classifier
            .as_deref()
            .ok_or(ScoringError::ModelUnavailable)
    }

    /// Score one transaction. The fraud label is the classifier's own.
    pub fn score(&self, body: Option<&Value>) -> Result<Verdict, ScoringError> {
        let classifier = self.classifier()?;

        let raw = body.filter(|v| !is_blank(v)).ok_or(ScoringError::MissingBody)?;
        let record = TransactionRecord::validate(raw)?;
        let features = FeatureExtractor::new().derive(&record)?;

        let output = classifier
            .classify(&features)
            .map_err(|e| ScoringError::ClassifierInvocation(e.to_string()))?;
        let [_, probability] = output.probabilities;

        let verdict = decide(probability, DecisionMode::Single { label: output.label });

        info!(
            model = classifier.name(),
            kind = %features.kind,
            is_fraud = verdict.is_fraud,
            fraud_probability = verdict.fraud_probability,
            confidence = verdict.confidence.as_str(),
            "Prediction made"
        );

        Ok(verdict)
    }

    /// Score every transaction of a batch independently.
    ///
    /// Per-item failures are reported inline; only a missing classifier or a
    /// malformed top-level body fail the whole request. The result has one
    /// entry per input transaction, in input order.
    pub fn score_batch(&self, body: Option<&Value>) -> Result<Vec<BatchOutcome>, ScoringError> {
        let classifier = self.classifier()?;

        let transactions = body
            .filter(|v| !is_blank(v))
            .and_then(|v| v.get("transactions"))
            .ok_or(ScoringError::NoTransactions)?;

        let items = transactions.as_array().ok_or_else(|| {
            ScoringError::BatchFailed(format!(
                "'transactions' must be an array, got {}",
                json_type(transactions)
            ))
        })?;

        let outcomes = items
            .iter()
            .enumerate()
            .map(|(index, raw)| match self.score_item(classifier, raw) {
                Ok(verdict) => BatchOutcome::scored(index, verdict),
                Err(e) => {
                    warn!(index, error = %e, kind = e.kind(), "Batch item failed");
                    BatchOutcome::failed(index, e.to_string())
                }
            })
            .collect();

        Ok(outcomes)
    }

    // The batch label comes from the probability threshold, not `predict`.
    fn score_item(&self, classifier: &dyn Classifier, raw: &Value) -> Result<Verdict, ScoringError> {
        let record = TransactionRecord::validate(raw)?;
        let features = FeatureExtractor::new().derive(&record)?;
        let probability = fraud_probability(classifier, &features)?;
        Ok(decide(probability, DecisionMode::Batch))
    }
}

fn fraud_probability(
    classifier: &dyn Classifier,
    features: &FeatureVector,
) -> Result<f64, ScoringError> {
    let [_, fraud] = classifier
        .predict_probability(features)
        .map_err(|e| ScoringError::ClassifierInvocation(e.to_string()))?;
    Ok(fraud)
}

/// `null`, `{}`, `[]`, `""`, `0` and `false` count as no data.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
