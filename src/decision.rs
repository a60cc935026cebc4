//! Turning a fraud probability into a verdict

use crate::types::verdict::{Confidence, Verdict};

/// Batch verdicts flag fraud strictly above this probability.
pub const FRAUD_THRESHOLD: f64 = 0.8;

/// Probabilities strictly below this are confidently legitimate.
pub const LEGITIMATE_BOUND: f64 = 0.2;

/// Where the fraud label comes from.
///
/// The single endpoint trusts the classifier's own label while the batch
/// endpoint thresholds the probability, so the two can disagree on the same
/// transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionMode {
    /// Use the label predicted by the classifier
    Single { label: bool },
    /// Use `probability > FRAUD_THRESHOLD`
    Batch,
}

impl Confidence {
    /// `High` outside the `[0.2, 0.8]` band, `Medium` inside it.
    pub fn from_probability(probability: f64) -> Self {
        if probability > FRAUD_THRESHOLD || probability < LEGITIMATE_BOUND {
            Confidence::High
        } else {
            Confidence::Medium
        }
    }
}

/// Build the verdict for one transaction.
pub fn decide(probability: f64, mode: DecisionMode) -> Verdict {
    let is_fraud = match mode {
        DecisionMode::Single { label } => label,
        DecisionMode::Batch => probability > FRAUD_THRESHOLD,
    };

    Verdict {
        is_fraud,
        fraud_probability: probability,
        confidence: Confidence::from_probability(probability),
    }
}
