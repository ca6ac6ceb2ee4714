//! Structured logging setup and ndjson result output.

mod format;

pub use format::{PredictionLine, StructuredLogger};
