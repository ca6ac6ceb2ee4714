//! Transport protocol histogram over the `protocol_type` column.

use crate::records::{Column, RecordSet};
use serde::{Deserialize, Serialize};

/// Counts for the closed set {TCP, UDP, ICMP}. Other labels are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolCounts {
    #[serde(rename = "TCP")]
    pub tcp: u64,
    #[serde(rename = "UDP")]
    pub udp: u64,
    #[serde(rename = "ICMP")]
    pub icmp: u64,
}

impl ProtocolCounts {
    pub fn total(&self) -> u64 {
        self.tcp + self.udp + self.icmp
    }
}

/// Uppercase each label and bucket exact matches. A missing column yields all zeros.
pub fn count_protocols(records: &RecordSet) -> ProtocolCounts {
    let mut counts = ProtocolCounts::default();
    let Some(labels) = records.text(Column::ProtocolType) else {
        return counts;
    };
    for label in labels {
        match label.to_uppercase().as_str() {
            "TCP" => counts.tcp += 1,
            "UDP" => counts.udp += 1,
            "ICMP" => counts.icmp += 1,
            _ => {}
        }
    }
    counts
}
