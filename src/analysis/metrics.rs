//! Per-record numeric projection for client-side charting. Not aggregated.

use crate::records::{Column, Numeric, RecordSet};
use serde::{Deserialize, Serialize};

pub const METRIC_COLUMNS: [Column; 3] = [Column::Duration, Column::SrcBytes, Column::DstBytes];

/// Three sequences aligned by record position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalMetrics {
    pub duration: Vec<Numeric>,
    pub src_bytes: Vec<Numeric>,
    pub dst_bytes: Vec<Numeric>,
}

/// Missing metric columns are completed with zeros first; values pass through as read.
pub fn extract_metrics(records: &mut RecordSet) -> AdditionalMetrics {
    records.complete(&METRIC_COLUMNS);
    let column = |c: Column| records.numeric(c).map(<[Numeric]>::to_vec).unwrap_or_default();
    AdditionalMetrics {
        duration: column(Column::Duration),
        src_bytes: column(Column::SrcBytes),
        dst_bytes: column(Column::DstBytes),
    }
}
