//! nids-insight: network traffic CSV analysis and intrusion classification.
//!
//! Modular structure:
//! - [`records`]: CSV loading into typed, column-complete record sets
//! - [`analysis`]: Protocol counts, anomaly partition, metrics, anomaly detail rows
//! - [`features`]: Protocol normalization and classifier feature vectors
//! - [`model`]: Pre-trained classifier loading and batch inference
//! - [`storage`]: Latest snapshot holder and anomaly alert feed
//! - [`server`]: HTTP upload/query service with an SSE alert stream
//! - [`logging`]: Structured JSON logging

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod records;
pub mod server;
pub mod storage;

pub use analysis::{analyze, Snapshot};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use features::{FeaturePreprocessor, FeatureVector, Protocol};
pub use logging::StructuredLogger;
pub use model::{load_classifier, predict, run_prediction, Classifier, OnnxClassifier};
pub use records::{ingest, Column, RecordSet};
pub use storage::SnapshotStore;
