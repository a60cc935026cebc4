//! ONNX model loader

use anyhow::{anyhow, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loaded ONNX model with metadata
pub struct LoadedModel {
    /// Model name
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the feature tensor
    pub input_name: String,
    /// Output name for class probabilities
    pub probability_output: String,
    /// Output name for the predicted label, when the export has one
    pub label_output: Option<String>,
}

/// Loader for ONNX models
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load an ONNX model from file
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<LoadedModel> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow!("Model file not found: {}", path.display()));
        }

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()
            .map_err(|e| anyhow!("Failed to create session builder: {}", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| anyhow!("Failed to set optimization level: {}", e))?
            .with_intra_threads(self.onnx_threads)
            .map_err(|e| anyhow!("Failed to set intra-op threads: {}", e))?
            .commit_from_file(path)
            .map_err(|e| anyhow!("Failed to load model from {:?}: {}", path, e))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let (probability_output, label_output) = pick_outputs(&output_names);

        info!(
            model = %name,
            input = %input_name,
            probabilities = %probability_output,
            label = ?label_output,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            name: name.to_string(),
            session,
            input_name,
            probability_output,
            label_output,
        })
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Choose the probability and label outputs from a model's output names.
///
/// Classifier exports usually name them `probabilities` and `label`; the
/// probability output falls back to the last output.
fn pick_outputs(names: &[String]) -> (String, Option<String>) {
    let label = names.iter().find(|n| n.contains("label")).cloned();

    let candidates = names.iter().filter(|n| Some(*n) != label.as_ref());

    let probability = names
        .iter()
        .find(|n| n.contains("prob"))
        .or_else(|| candidates.clone().find(|n| n.contains("output")))
        .or_else(|| candidates.clone().last())
        .cloned()
        .unwrap_or_else(|| "probabilities".to_string());

    (probability, label)
}
