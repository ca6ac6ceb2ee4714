//! Attack/normal classification of individual records with a pre-trained model.

mod onnx;

pub use onnx::OnnxClassifier;

use crate::config::{AppConfig, ModelConfig};
use crate::error::{Error, Result};
use crate::features::{FeatureMatrix, FeaturePreprocessor};
use crate::records::RecordSet;
use std::time::Instant;
use tracing::{debug, info};

/// Batch classifier: one label per matrix row, in row order.
pub trait Classifier: Send + Sync {
    fn predict_batch(&self, features: &FeatureMatrix) -> Result<Vec<String>>;
}

/// Load the configured ONNX artifact. Called once per predict invocation.
pub fn load_classifier(config: &ModelConfig) -> Result<OnnxClassifier> {
    OnnxClassifier::load(config)
}

/// Preprocess the record set, then classify every record.
pub fn predict<C: Classifier + ?Sized>(
    classifier: &C,
    preprocessor: &FeaturePreprocessor,
    mut records: RecordSet,
) -> Result<Vec<String>> {
    let start = Instant::now();
    let matrix = preprocessor.matrix(&mut records)?;
    debug!(
        rows = matrix.rows(),
        cols = matrix.cols(),
        defaulted = ?records.defaulted(),
        "feature matrix ready"
    );

    let labels = classifier.predict_batch(&matrix)?;
    if labels.len() != records.len() {
        return Err(Error::Inference(format!(
            "classifier returned {} labels for {} records",
            labels.len(),
            records.len()
        )));
    }

    info!(
        records = labels.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "prediction complete"
    );
    Ok(labels)
}

/// Standalone predict path: fresh classifier, preprocessing per config.
pub fn run_prediction(config: &AppConfig, records: RecordSet) -> Result<Vec<String>> {
    let classifier = load_classifier(&config.model)?;
    let preprocessor = FeaturePreprocessor::new(config.features.clone());
    predict(&classifier, &preprocessor, records)
}
