//! Scoring outcomes returned to callers

use serde::Serialize;

/// Coarse distance of a probability from the decision boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
        }
    }
}

/// Verdict for one scored transaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub is_fraud: bool,
    pub fraud_probability: f64,
    pub confidence: Confidence,
}

/// One entry of a batch response: either a verdict or the reason the item
/// could not be scored, tagged with its position in the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub index: usize,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItemOutcome {
    Scored(Verdict),
    Failed { error: String },
}

impl BatchOutcome {
    pub fn scored(index: usize, verdict: Verdict) -> Self {
        Self {
            index,
            outcome: ItemOutcome::Scored(verdict),
        }
    }

    pub fn failed(index: usize, error: impl Into<String>) -> Self {
        Self {
            index,
            outcome: ItemOutcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.outcome {
            ItemOutcome::Scored(verdict) => Some(verdict),
            ItemOutcome::Failed { .. } => None,
        }
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ItemOutcome::Scored(_) => None,
            ItemOutcome::Failed { error } => Some(error),
        }
    }
}
