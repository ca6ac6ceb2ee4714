//! ONNX Runtime classifier. Input: [n, 4] f32. The first output is either a
//! string label tensor, used as is, or an i64 class index tensor mapped to names
//! through `model.class_labels`.

use super::Classifier;
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::features::{FeatureMatrix, FEATURE_DIM};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Mutex;

/// ort panics when the runtime library cannot be loaded; surface that as a load error.
fn build_session(path: &Path, bytes: &[u8]) -> Result<Session> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        Session::builder()
            .map_err(|e| Error::ModelLoad(format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| Error::ModelLoad(format!("optimization level: {}", e)))?
            .commit_from_memory(bytes)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", path.display(), e)))
    }))
    .unwrap_or_else(|payload| {
        Err(Error::ModelLoad(format!(
            "onnx runtime unavailable: {}",
            panic_message(payload.as_ref())
        )))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic")
}

fn label_for(class_labels: &[String], index: i64) -> Result<String> {
    usize::try_from(index)
        .ok()
        .and_then(|i| class_labels.get(i))
        .cloned()
        .ok_or_else(|| Error::Inference(format!("class index {} has no configured label", index)))
}

pub struct OnnxClassifier {
    session: Mutex<Session>,
    output_name: String,
    class_labels: Vec<String>,
}

impl OnnxClassifier {
    /// Fails with a model load error if the file is missing, unreadable or not a valid model.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let path = &config.path;
        if !path.is_file() {
            return Err(Error::ModelLoad(format!("model not found: {}", path.display())));
        }
        let bytes = std::fs::read(path)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", path.display(), e)))?;
        if bytes.is_empty() {
            return Err(Error::ModelLoad(format!("{}: empty model file", path.display())));
        }

        let session = build_session(path, &bytes)?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| Error::ModelLoad(format!("{}: model has no outputs", path.display())))?;

        tracing::info!(
            path = %path.display(),
            output = %output_name,
            classes = config.class_labels.len(),
            "classifier loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            class_labels: config.class_labels.clone(),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict_batch(&self, features: &FeatureMatrix) -> Result<Vec<String>> {
        if features.cols() != FEATURE_DIM {
            return Err(Error::Inference(format!(
                "expected {} feature columns, got {}",
                FEATURE_DIM,
                features.cols()
            )));
        }
        if features.rows() == 0 {
            return Ok(Vec::new());
        }

        let input = Value::from_array(features.view().to_owned())
            .map_err(|e| Error::Inference(format!("tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Inference("session lock poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| Error::Inference(format!("run: {}", e)))?;
        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| Error::Inference(format!("missing output `{}`", self.output_name)))?;

        if let Ok((_, labels)) = output.try_extract_strings() {
            return Ok(labels);
        }
        let (_, indices) = output.try_extract_tensor::<i64>().map_err(|e| {
            Error::Inference(format!("label output is neither string nor i64: {}", e))
        })?;
        indices.iter().map(|&i| label_for(&self.class_labels, i)).collect()
    }
}
