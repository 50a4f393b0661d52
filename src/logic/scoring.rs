//! Scoring Client - ONNX Runtime Integration
//!
//! Maps a batch of URLs to phishing probabilities (percent), one per URL,
//! in input order.
//!
//! The model takes a 1-D string tensor named `inputs` and yields a
//! `probabilities` tensor of shape `[n, 2]` holding (benign, phishing)
//! scores in [0, 1] per row.
//!
//! A fresh session is built for every call. Session construction is the
//! expensive part of a request; nothing is cached between requests.

use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;
use ndarray::Array1;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

use crate::error::ScoringError;

const INPUT_NAME: &str = "inputs";
const OUTPUT_NAME: &str = "probabilities";

/// Column of the phishing class in each output row
const PHISHING_COLUMN: usize = 1;
const CLASS_COUNT: usize = 2;

/// Anything that turns URL batches into phishing percentages
#[async_trait]
pub trait Scorer: Send + Sync {
    /// `urls` must be non-empty. Output is positionally aligned with input.
    async fn score(&self, urls: &[String]) -> Result<Vec<f64>, ScoringError>;
}

/// Scorer backed by an ONNX model file
#[derive(Debug, Clone)]
pub struct OnnxScorer {
    model_path: PathBuf,
}

impl OnnxScorer {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
        }
    }

    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }
}

#[async_trait]
impl Scorer for OnnxScorer {
    async fn score(&self, urls: &[String]) -> Result<Vec<f64>, ScoringError> {
        if urls.is_empty() {
            return Err(ScoringError::EmptyBatch);
        }

        let model_path = self.model_path.clone();
        let batch = urls.to_vec();

        // Session build and inference are CPU-bound
        tokio::task::spawn_blocking(move || run_inference(&model_path, batch))
            .await
            .map_err(|e| ScoringError::Inference(format!("Inference task aborted: {}", e)))?
    }
}

fn run_inference(model_path: &std::path::Path, urls: Vec<String>) -> Result<Vec<f64>, ScoringError> {
    let start_time = Instant::now();
    let batch_size = urls.len();

    if !model_path.exists() {
        return Err(ScoringError::Session(format!(
            "Model not found: {}",
            model_path.display()
        )));
    }

    let mut session = Session::builder()
        .map_err(|e| ScoringError::Session(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| ScoringError::Session(format!("Failed to set optimization: {}", e)))?
        .commit_from_file(model_path)
        .map_err(|e| ScoringError::Session(format!("Failed to load model: {}", e)))?;

    let input_array = Array1::from_vec(urls);
    let input_tensor = Tensor::from_string_array(&input_array)
        .map_err(|e| ScoringError::Inference(format!("Tensor error: {}", e)))?;

    let outputs = session
        .run(ort::inputs![INPUT_NAME => input_tensor])
        .map_err(|e| ScoringError::Inference(e.to_string()))?;

    let output = outputs
        .get(OUTPUT_NAME)
        .ok_or_else(|| ScoringError::MalformedOutput(format!("Missing output '{}'", OUTPUT_NAME)))?;

    let (_, scores) = output
        .try_extract_tensor::<f32>()
        .map_err(|e| ScoringError::MalformedOutput(format!("Extract error: {}", e)))?;

    let probabilities = phishing_probabilities(scores, batch_size)?;

    tracing::debug!(
        "Scored {} URL(s) in {}ms",
        batch_size,
        start_time.elapsed().as_millis()
    );

    Ok(probabilities)
}

/// Pull the phishing column out of row-major (benign, phishing) pairs and
/// scale it to percent.
pub fn phishing_probabilities(scores: &[f32], batch_size: usize) -> Result<Vec<f64>, ScoringError> {
    let expected = batch_size * CLASS_COUNT;
    if scores.len() < expected {
        return Err(ScoringError::MalformedOutput(format!(
            "Expected {} scores for {} URL(s), got {}",
            expected,
            batch_size,
            scores.len()
        )));
    }

    scores
        .chunks_exact(CLASS_COUNT)
        .take(batch_size)
        .map(|row| {
            let score = row[PHISHING_COLUMN];
            if !score.is_finite() || !(0.0..=1.0).contains(&score) {
                return Err(ScoringError::MalformedOutput(format!(
                    "Score out of range: {}",
                    score
                )));
            }
            Ok(f64::from(score) * 100.0)
        })
        .collect()
}
