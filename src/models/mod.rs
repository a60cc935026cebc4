//! Classifier capability and its ONNX Runtime implementation

pub mod inference;
pub mod loader;

#[cfg(test)]
pub mod testing;

pub use inference::OnnxClassifier;
pub use loader::ModelLoader;

use crate::feature_extractor::FeatureVector;
use anyhow::Result;

/// Everything one classifier run yields for a transaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOutput {
    /// Predicted label (`true` = fraud)
    pub label: bool,
    /// `[p_legitimate, p_fraud]`
    pub probabilities: [f64; 2],
}

/// A pre-trained binary fraud classifier.
///
/// Implementations are shared across concurrent requests and must not
/// carry per-call state.
pub trait Classifier: Send + Sync {
    /// Label and class probabilities from a single run
    fn classify(&self, features: &FeatureVector) -> Result<ModelOutput>;

    /// Predicted label (`true` = fraud)
    fn predict(&self, features: &FeatureVector) -> Result<bool> {
        Ok(self.classify(features)?.label)
    }

    /// Class probabilities `[p_legitimate, p_fraud]`
    fn predict_probability(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        Ok(self.classify(features)?.probabilities)
    }

    /// Name used in logs
    fn name(&self) -> &str {
        "classifier"
    }
}
