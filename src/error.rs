//! Error taxonomy for the scoring pipeline

use thiserror::Error;

/// Everything that can go wrong while scoring a request or a batch item.
///
/// `Display` renders the bare message. The HTTP layer decides which prefix,
/// if any, is shown to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// No classifier was loaded at startup
    #[error("Model not loaded")]
    ModelUnavailable,

    /// The request body was absent, unparseable or empty
    #[error("No JSON data provided")]
    MissingBody,

    /// One or more required transaction fields are absent
    #[error("Missing required fields: {}", quoted_list(.0))]
    MissingFields(Vec<String>),

    /// A numeric field could not be coerced to a float
    #[error("could not convert field '{field}' to float: {raw}")]
    InvalidNumericField { field: String, raw: String },

    /// The classifier rejected the features or failed to run
    #[error("{0}")]
    ClassifierInvocation(String),

    /// The batch body has no `transactions` key
    #[error("No transactions provided")]
    NoTransactions,

    /// The batch could not be enumerated at all
    #[error("{0}")]
    BatchFailed(String),
}

impl ScoringError {
    /// Short machine-friendly name, used for logs and metrics labels
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::ModelUnavailable => "model_unavailable",
            ScoringError::MissingBody => "missing_body",
            ScoringError::MissingFields(_) => "missing_fields",
            ScoringError::InvalidNumericField { .. } => "invalid_numeric_field",
            ScoringError::ClassifierInvocation(_) => "classifier_invocation",
            ScoringError::NoTransactions => "no_transactions",
            ScoringError::BatchFailed(_) => "batch_failed",
        }
    }
}

/// `['amount', 'oldbalanceDest']`, the list rendering existing clients parse.
fn quoted_list(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
    format!("[{}]", quoted.join(", "))
}
