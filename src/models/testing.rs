//! In-memory classifiers for tests

use super::{Classifier, ModelOutput};
use crate::feature_extractor::FeatureVector;
use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Always answers with the same label and fraud probability.
pub struct FixedClassifier {
    pub label: bool,
    pub fraud_probability: f64,
}

impl FixedClassifier {
    pub fn new(label: bool, fraud_probability: f64) -> Self {
        Self {
            label,
            fraud_probability,
        }
    }
}

impl Classifier for FixedClassifier {
    fn classify(&self, _features: &FeatureVector) -> Result<ModelOutput> {
        Ok(ModelOutput {
            label: self.label,
            probabilities: [1.0 - self.fraud_probability, self.fraud_probability],
        })
    }
}

/// Scores by how much of the origin balance is sent, and refuses
/// transaction kinds it was not trained on.
pub struct RatioClassifier;

impl Classifier for RatioClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<ModelOutput> {
        if features.kind == "UNKNOWN" {
            return Err(anyhow!("unknown transaction type '{}'", features.kind));
        }
        let p = features.frac_sent.clamp(0.0, 1.0);
        Ok(ModelOutput {
            // Deliberately looser than the batch threshold
            label: p > 0.5,
            probabilities: [1.0 - p, p],
        })
    }
}

/// Wraps another classifier and counts how often it runs.
pub struct CountingClassifier<C> {
    inner: C,
    runs: AtomicUsize,
}

impl<C: Classifier> CountingClassifier<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            runs: AtomicUsize::new(0),
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl<C: Classifier> Classifier for CountingClassifier<C> {
    fn classify(&self, features: &FeatureVector) -> Result<ModelOutput> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.inner.classify(features)
    }
}
