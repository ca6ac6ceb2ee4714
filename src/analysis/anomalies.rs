//! Normal/abnormal partition on the `class` label.

use crate::records::{Column, RecordSet, NORMAL_LABEL};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyCounts {
    pub normal: u64,
    pub abnormal: u64,
}

/// Exact, case-sensitive match; anything else is abnormal.
pub fn is_normal(label: &str) -> bool {
    label == NORMAL_LABEL
}

/// Without a label column every record counts as normal.
pub fn partition(records: &RecordSet) -> AnomalyCounts {
    let Some(labels) = records.text(Column::Class) else {
        return AnomalyCounts {
            normal: records.len() as u64,
            abnormal: 0,
        };
    };
    let normal = labels.iter().filter(|l| is_normal(l)).count() as u64;
    AnomalyCounts {
        normal,
        abnormal: labels.len() as u64 - normal,
    }
}
