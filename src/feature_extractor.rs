//! Feature derivation for fraud classifier inference.
//!
//! Produces the feature vector in the exact column order the classifier was
//! trained on.

use crate::error::ScoringError;
use crate::types::transaction::TransactionRecord;
use serde_json::Value;

/// Additive smoothing for the ratio denominators.
pub const EPSILON: f64 = 1e-6;

/// Column names, in training order.
pub const FEATURE_NAMES: [&str; 8] = [
    "type",
    "amount",
    "oldbalanceOrg",
    "newbalanceOrig",
    "oldbalanceDest",
    "newbalanceDest",
    "frac_sent",
    "frac_received",
];

/// Classifier input for a single transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub kind: String,
    pub amount: f64,
    pub old_balance_orig: f64,
    pub new_balance_orig: f64,
    pub old_balance_dest: f64,
    pub new_balance_dest: f64,
    /// `amount / (oldbalanceOrg + ε)`
    pub frac_sent: f64,
    /// `amount / (oldbalanceDest + ε)`
    pub frac_received: f64,
}

impl FeatureVector {
    /// Numeric columns (everything after `type`), in training order.
    pub fn numeric(&self) -> [f64; 7] {
        [
            self.amount,
            self.old_balance_orig,
            self.new_balance_orig,
            self.old_balance_dest,
            self.new_balance_dest,
            self.frac_sent,
            self.frac_received,
        ]
    }
}

/// Turns validated transactions into classifier features.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Coerce the numeric fields and compute the two derived ratios.
    pub fn derive(&self, record: &TransactionRecord) -> Result<FeatureVector, ScoringError> {
        let [amount, old_balance_orig, new_balance_orig, old_balance_dest, new_balance_dest] = {
            let fields = record.numeric_fields();
            let mut values = [0.0; 5];
            for (slot, (name, raw)) in values.iter_mut().zip(fields) {
                *slot = coerce_f64(name, raw)?;
            }
            values
        };

        Ok(FeatureVector {
            kind: record.kind.clone(),
            amount,
            old_balance_orig,
            new_balance_orig,
            old_balance_dest,
            new_balance_dest,
            frac_sent: amount / (old_balance_orig + EPSILON),
            frac_received: amount / (old_balance_dest + EPSILON),
        })
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Numbers, numeric strings and booleans are accepted; anything else is a
/// format error naming the field and the offending value.
fn coerce_f64(field: &str, raw: &Value) -> Result<f64, ScoringError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    parsed.ok_or_else(|| ScoringError::InvalidNumericField {
        field: field.to_string(),
        raw: raw.to_string(),
    })
}
