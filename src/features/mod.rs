//! Classifier inputs: protocol vocabulary, per-record feature vectors, batch matrix.

mod pipeline;

pub use pipeline::{FeaturePreprocessor, FEATURE_COLUMNS};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Number of model inputs per record.
pub const FEATURE_DIM: usize = 4;

/// Closed protocol vocabulary seen by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    Other,
}

impl Protocol {
    /// Lowercase, then anything outside {tcp, udp, icmp} is `Other`.
    pub fn normalize(raw: &str) -> Protocol {
        match raw.to_lowercase().as_str() {
            "tcp" => Protocol::Tcp,
            "udp" => Protocol::Udp,
            "icmp" => Protocol::Icmp,
            _ => Protocol::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Icmp => "icmp",
            Protocol::Other => "other",
        }
    }

    /// Category index in the sorted vocabulary (icmp, other, tcp, udp).
    pub fn code(self) -> f32 {
        match self {
            Protocol::Icmp => 0.0,
            Protocol::Other => 1.0,
            Protocol::Tcp => 2.0,
            Protocol::Udp => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub duration: f64,
    pub protocol_type: Protocol,
    pub src_bytes: f64,
    pub dst_bytes: f64,
}

impl FeatureVector {
    /// Model input order: duration, protocol_type, src_bytes, dst_bytes
    pub fn to_array(&self) -> [f32; FEATURE_DIM] {
        [
            self.duration as f32,
            self.protocol_type.code(),
            self.src_bytes as f32,
            self.dst_bytes as f32,
        ]
    }
}

/// Row-per-record batch handed to a classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    values: Array2<f32>,
}

impl FeatureMatrix {
    pub fn from_vectors(vectors: &[FeatureVector]) -> Self {
        let mut values = Array2::<f32>::zeros((vectors.len(), FEATURE_DIM));
        for (mut row, fv) in values.rows_mut().into_iter().zip(vectors) {
            for (slot, v) in row.iter_mut().zip(fv.to_array()) {
                *slot = v;
            }
        }
        Self { values }
    }

    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn view(&self) -> ndarray::ArrayView2<'_, f32> {
        self.values.view()
    }
}
