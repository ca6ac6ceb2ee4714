//! Feature preprocessing: record set → normalized protocol column → feature vectors.

use super::{FeatureMatrix, FeatureVector, Protocol};
use crate::config::FeaturesConfig;
use crate::error::{Error, Result};
use crate::records::{Column, RecordSet};

/// Required model inputs, in model order.
pub const FEATURE_COLUMNS: [Column; 4] = [
    Column::Duration,
    Column::ProtocolType,
    Column::SrcBytes,
    Column::DstBytes,
];

pub struct FeaturePreprocessor {
    config: FeaturesConfig,
}

impl FeaturePreprocessor {
    pub fn new(config: FeaturesConfig) -> Self {
        Self { config }
    }

    /// Rewrite `protocol_type` in place to the closed vocabulary and complete
    /// missing numeric features with zeros.
    pub fn normalize(&self, records: &mut RecordSet) -> Result<()> {
        if !records.has(Column::ProtocolType) {
            if self.config.require_protocol_column {
                return Err(Error::Validation(format!(
                    "required column `{}` is missing",
                    Column::ProtocolType
                )));
            }
            records.complete(&[Column::ProtocolType]);
        }
        if let Some(protocols) = records.text_mut(Column::ProtocolType) {
            for value in protocols.iter_mut() {
                let normalized = Protocol::normalize(value).as_str();
                if value != normalized {
                    *value = normalized.to_string();
                }
            }
        }
        records.complete(&FEATURE_COLUMNS);
        Ok(())
    }

    /// Normalize, then read one feature vector per record in source order.
    pub fn vectors(&self, records: &mut RecordSet) -> Result<Vec<FeatureVector>> {
        self.normalize(records)?;
        let records: &RecordSet = records;

        let numeric = |c: Column| {
            records
                .numeric(c)
                .ok_or_else(|| Error::Validation(format!("column `{}` is not numeric", c)))
        };
        let duration = numeric(Column::Duration)?;
        let src_bytes = numeric(Column::SrcBytes)?;
        let dst_bytes = numeric(Column::DstBytes)?;
        let protocols = records.text(Column::ProtocolType).ok_or_else(|| {
            Error::Validation(format!("column `{}` is not text", Column::ProtocolType))
        })?;

        Ok((0..records.len())
            .map(|i| FeatureVector {
                duration: duration.get(i).map_or(0.0, |n| n.as_f64()),
                protocol_type: protocols
                    .get(i)
                    .map_or(Protocol::Other, |p| Protocol::normalize(p)),
                src_bytes: src_bytes.get(i).map_or(0.0, |n| n.as_f64()),
                dst_bytes: dst_bytes.get(i).map_or(0.0, |n| n.as_f64()),
            })
            .collect())
    }

    pub fn matrix(&self, records: &mut RecordSet) -> Result<FeatureMatrix> {
        let vectors = self.vectors(records)?;
        Ok(FeatureMatrix::from_vectors(&vectors))
    }
}
