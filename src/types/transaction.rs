//! Transaction records accepted by the scoring endpoints

use crate::error::ScoringError;
use serde_json::{Map, Value};

/// Fields every transaction must carry, in the order they are reported
/// when missing.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "type",
    "amount",
    "oldbalanceOrg",
    "newbalanceOrig",
    "oldbalanceDest",
    "newbalanceDest",
];

/// A transaction whose required fields are all present.
///
/// Numeric fields are kept as the raw JSON the caller sent; coercion to
/// floats happens during feature derivation so that a bad value is reported
/// as a format problem rather than a missing field.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Transaction kind (e.g. `TRANSFER`), passed through to the classifier
    pub kind: String,
    pub amount: Value,
    pub old_balance_orig: Value,
    pub new_balance_orig: Value,
    pub old_balance_dest: Value,
    pub new_balance_dest: Value,
}

/// Raw request input, classified at the boundary before any numeric work.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionInput {
    WellFormed(TransactionRecord),
    Malformed { missing: Vec<String> },
}

impl TransactionInput {
    /// Classify an untyped JSON value.
    ///
    /// Anything that is not a JSON object is treated as missing every field.
    pub fn from_json(raw: &Value) -> Self {
        let Some(map) = raw.as_object() else {
            return TransactionInput::Malformed {
                missing: REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
            };
        };

        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| !map.contains_key(**field))
            .map(|field| field.to_string())
            .collect();

        if !missing.is_empty() {
            return TransactionInput::Malformed { missing };
        }

        TransactionInput::WellFormed(TransactionRecord {
            kind: kind_text(&map["type"]),
            amount: take(map, "amount"),
            old_balance_orig: take(map, "oldbalanceOrg"),
            new_balance_orig: take(map, "newbalanceOrig"),
            old_balance_dest: take(map, "oldbalanceDest"),
            new_balance_dest: take(map, "newbalanceDest"),
        })
    }

    /// Collapse into a `Result`, turning `Malformed` into `MissingFields`.
    pub fn into_result(self) -> Result<TransactionRecord, ScoringError> {
        match self {
            TransactionInput::WellFormed(record) => Ok(record),
            TransactionInput::Malformed { missing } => Err(ScoringError::MissingFields(missing)),
        }
    }
}

impl TransactionRecord {
    /// Presence check of the required fields. No defaults are substituted.
    pub fn validate(raw: &Value) -> Result<Self, ScoringError> {
        TransactionInput::from_json(raw).into_result()
    }

    /// Raw numeric fields paired with their wire names, in feature order.
    pub fn numeric_fields(&self) -> [(&'static str, &Value); 5] {
        [
            ("amount", &self.amount),
            ("oldbalanceOrg", &self.old_balance_orig),
            ("newbalanceOrig", &self.new_balance_orig),
            ("oldbalanceDest", &self.old_balance_dest),
            ("newbalanceDest", &self.new_balance_dest),
        ]
    }
}

fn take(map: &Map<String, Value>, key: &str) -> Value {
    map.get(key).cloned().unwrap_or(Value::Null)
}

// Non-string kinds are forwarded verbatim as their JSON text.
fn kind_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "type": "TRANSFER",
            "amount": 1000,
            "oldbalanceOrg": 1000,
            "newbalanceOrig": 0,
            "oldbalanceDest": 0,
            "newbalanceDest": 1000
        })
    }

    #[test]
    fn test_complete_record_validates() {
        let record = TransactionRecord::validate(&sample()).unwrap();
        assert_eq!(record.kind, "TRANSFER");
        assert_eq!(record.amount, json!(1000));
        assert_eq!(record.new_balance_dest, json!(1000));
    }

    #[test]
    fn test_missing_amount_is_reported_alone() {
        let mut raw = sample();
        raw.as_object_mut().unwrap().remove("amount");

        let err = TransactionRecord::validate(&raw).unwrap_err();
        assert_eq!(err, ScoringError::MissingFields(vec!["amount".to_string()]));
    }

    #[test]
    fn test_missing_fields_keep_required_order() {
        let raw = json!({ "newbalanceDest": 1, "amount": 5 });
        match TransactionInput::from_json(&raw) {
            TransactionInput::Malformed { missing } => assert_eq!(
                missing,
                vec!["type", "oldbalanceOrg", "newbalanceOrig", "oldbalanceDest"]
            ),
            other => panic!("expected malformed input, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_is_missing_everything() {
        let err = TransactionRecord::validate(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(
            err,
            ScoringError::MissingFields(REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect())
        );
    }

    #[test]
    fn test_presence_check_ignores_value_types() {
        let mut raw = sample();
        raw["amount"] = json!("not a number");
        raw["type"] = json!(4);

        let record = TransactionRecord::validate(&raw).unwrap();
        assert_eq!(record.amount, json!("not a number"));
        assert_eq!(record.kind, "4");
    }
}
