//! Error taxonomy shared by the pipeline, the inference path and the CLI.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Input is not valid delimited tabular data, or a typed cell failed conversion.
    #[error("parse error: {0}")]
    Parse(String),

    /// A structurally required column is missing and no default policy applies.
    #[error("validation error: {0}")]
    Validation(String),

    /// Model artifact unreadable or incompatible.
    #[error("model load error: {0}")]
    ModelLoad(String),

    /// Classifier rejected the feature matrix or produced unusable output.
    #[error("inference error: {0}")]
    Inference(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
