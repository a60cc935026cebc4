//! ONNX Runtime backed fraud classifier

use crate::config::ModelConfig;
use crate::feature_extractor::{FeatureVector, FEATURE_NAMES};
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::models::{Classifier, ModelOutput};
use anyhow::{anyhow, Context, Result};
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use std::sync::Mutex;
use tracing::debug;

/// Name under which the model shows up in logs
const MODEL_NAME: &str = "fraud_detection_pipeline";

/// Fraud classifier backed by a single ONNX session.
///
/// The session needs exclusive access to run, so calls are serialised
/// behind a mutex.
pub struct OnnxClassifier {
    model: Mutex<LoadedModel>,
    /// Ordinal encoding of the `type` column
    transaction_types: Vec<String>,
}

impl OnnxClassifier {
    /// Load the model named by the configuration
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.onnx_threads);
        let model = loader
            .load_model(&config.path, MODEL_NAME)
            .with_context(|| format!("Failed to load classifier from {}", config.path))?;

        Ok(Self {
            model: Mutex::new(model),
            transaction_types: config.transaction_types.clone(),
        })
    }

    /// Flatten features into the `[1, 8]` tensor layout the model expects.
    fn encode(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        let code = encode_kind(&self.transaction_types, &features.kind)?;

        let mut row = Vec::with_capacity(FEATURE_NAMES.len());
        row.push(code);
        row.extend(features.numeric().iter().map(|&v| v as f32));
        Ok(row)
    }

    fn run(&self, features: &FeatureVector) -> Result<ModelOutput> {
        let row = self.encode(features)?;

        let mut model = self
            .model
            .lock()
            .map_err(|e| anyhow!("Lock error: {}", e))?;
        let model = &mut *model;

        let shape = vec![1_i64, row.len() as i64];
        let input_tensor = Tensor::from_array((shape, row))
            .map_err(|e| anyhow!("Failed to create input tensor: {}", e))?;

        let outputs = model
            .session
            .run(ort::inputs![model.input_name.as_str() => input_tensor])
            .map_err(|e| anyhow!("Inference failed: {}", e))?;

        let probabilities = match outputs.get(model.probability_output.as_str()) {
            Some(output) => extract_probabilities(output)?,
            None => {
                return Err(anyhow!(
                    "Model output '{}' missing",
                    model.probability_output
                ))
            }
        };

        let label = match &model.label_output {
            Some(name) => match outputs.get(name.as_str()) {
                Some(output) => {
                    let (_, data) = output
                        .try_extract_tensor::<i64>()
                        .map_err(|e| anyhow!("Failed to read label output: {}", e))?;
                    data.first().map(|&v| v != 0)
                }
                None => None,
            },
            None => None,
        };

        // Exports without a label output decide by the larger class probability
        let label = label.unwrap_or(probabilities[1] > probabilities[0]);

        debug!(
            model = %model.name,
            label,
            fraud_probability = probabilities[1],
            "Inference complete"
        );

        Ok(ModelOutput {
            label,
            probabilities,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<ModelOutput> {
        self.run(features)
    }

    fn name(&self) -> &str {
        MODEL_NAME
    }
}

/// Ordinal code of a transaction kind within the training vocabulary.
fn encode_kind(vocabulary: &[String], kind: &str) -> Result<f32> {
    vocabulary
        .iter()
        .position(|known| known == kind)
        .map(|idx| idx as f32)
        .ok_or_else(|| anyhow!("Found unknown categories ['{}'] in column 0 during transform", kind))
}

/// Read `[p0, p1]` from either a probability tensor or a `seq(map(int64, float))`.
fn extract_probabilities(output: &ort::value::DynValue) -> Result<[f64; 2]> {
    let probabilities = if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        from_tensor(&shape.iter().copied().collect::<Vec<i64>>(), data)?
    } else if DynSequenceValueType::can_downcast(&output.dtype()) {
        from_sequence_map(output)?
    } else {
        return Err(anyhow!("Unsupported probability output type"));
    };

    check_probabilities(probabilities)
}

/// `[batch, 2]` or `[2]` hold both classes; `[batch, 1]` or `[1]` hold the
/// fraud probability only.
fn from_tensor(dims: &[i64], data: &[f32]) -> Result<[f64; 2]> {
    let classes = dims.last().copied().unwrap_or(0);

    match (classes, data) {
        (c, [p0, p1, ..]) if c >= 2 => Ok([*p0 as f64, *p1 as f64]),
        (1, [p1, ..]) => Ok([1.0 - *p1 as f64, *p1 as f64]),
        _ => Err(anyhow!("Unexpected probability tensor shape {:?}", dims)),
    }
}

/// Zipmap exports emit one `{class_id: probability}` map per row.
fn from_sequence_map(output: &ort::value::DynValue) -> Result<[f64; 2]> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow!("Failed to downcast to sequence: {}", e))?;

    let maps = sequence
        .try_extract_sequence::<DynMapValueType>(&allocator)
        .map_err(|e| anyhow!("Failed to read probability sequence: {}", e))?;

    let first = maps.first().ok_or_else(|| anyhow!("Empty sequence"))?;

    let kv_pairs = first
        .try_extract_key_values::<i64, f32>()
        .map_err(|e| anyhow!("Failed to read probability map: {}", e))?;

    probabilities_from_pairs(&kv_pairs)
}

fn probabilities_from_pairs(pairs: &[(i64, f32)]) -> Result<[f64; 2]> {
    let lookup = |class: i64| {
        pairs
            .iter()
            .find(|(id, _)| *id == class)
            .map(|(_, p)| *p as f64)
    };

    match (lookup(0), lookup(1)) {
        (Some(p0), Some(p1)) => Ok([p0, p1]),
        (None, Some(p1)) => Ok([1.0 - p1, p1]),
        (Some(p0), None) => Ok([p0, 1.0 - p0]),
        (None, None) => Err(anyhow!("No probability found in map")),
    }
}

fn check_probabilities(probabilities: [f64; 2]) -> Result<[f64; 2]> {
    if probabilities
        .iter()
        .all(|p| p.is_finite() && (0.0..=1.0).contains(p))
    {
        Ok(probabilities)
    } else {
        Err(anyhow!(
            "Classifier returned invalid probabilities {:?}",
            probabilities
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vec<String> {
        ["CASH_IN", "CASH_OUT", "DEBIT", "PAYMENT", "TRANSFER"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_encode_kind() {
        assert_eq!(encode_kind(&vocabulary(), "CASH_IN").unwrap(), 0.0);
        assert_eq!(encode_kind(&vocabulary(), "TRANSFER").unwrap(), 4.0);

        let err = encode_kind(&vocabulary(), "WIRE").unwrap_err();
        assert!(err.to_string().contains("unknown categories ['WIRE']"));
    }

    #[test]
    fn test_probabilities_from_tensor() {
        assert_eq!(from_tensor(&[1, 2], &[0.25, 0.75]).unwrap(), [0.25, 0.75]);
        assert_eq!(from_tensor(&[2], &[0.5, 0.5]).unwrap(), [0.5, 0.5]);

        let single = from_tensor(&[1, 1], &[0.75]).unwrap();
        assert_eq!(single, [0.25, 0.75]);

        assert!(from_tensor(&[1, 0], &[]).is_err());
    }

    #[test]
    fn test_probabilities_from_map_pairs() {
        assert_eq!(
            probabilities_from_pairs(&[(0, 0.25), (1, 0.75)]).unwrap(),
            [0.25, 0.75]
        );
        assert_eq!(probabilities_from_pairs(&[(1, 0.5)]).unwrap(), [0.5, 0.5]);
        assert!(probabilities_from_pairs(&[(7, 0.5)]).is_err());
    }

    #[test]
    fn test_invalid_probabilities_rejected() {
        assert!(check_probabilities([0.1, 0.9]).is_ok());
        assert!(check_probabilities([-0.1, 1.1]).is_err());
        assert!(check_probabilities([f64::NAN, 0.5]).is_err());
    }
}
