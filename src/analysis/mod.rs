//! Upload analysis: four independent summaries over one record set.

mod anomalies;
mod metrics;
mod protocols;
mod report;

pub use anomalies::{is_normal, partition, AnomalyCounts};
pub use metrics::{extract_metrics, AdditionalMetrics, METRIC_COLUMNS};
pub use protocols::{count_protocols, ProtocolCounts};
pub use report::{detailed_anomalies, DetailedAnomaly, DETAIL_COLUMNS};

use crate::records::RecordSet;
use serde::{Deserialize, Serialize};

/// Latest computed result served to dashboard clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub protocol_counts: ProtocolCounts,
    pub anomaly_data: AnomalyCounts,
    pub additional_metrics: AdditionalMetrics,
    pub detailed_anomaly_data: Vec<DetailedAnomaly>,
}

impl Snapshot {
    /// Zero state served before any upload succeeds
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Run every summary over the record set, consuming it.
pub fn analyze(mut records: RecordSet) -> Snapshot {
    let _span = tracing::info_span!("analyze", records = records.len()).entered();

    let protocol_counts = count_protocols(&records);
    let anomaly_data = partition(&records);
    let additional_metrics = extract_metrics(&mut records);
    let detailed_anomaly_data = detailed_anomalies(&mut records);

    tracing::info!(
        tcp = protocol_counts.tcp,
        udp = protocol_counts.udp,
        icmp = protocol_counts.icmp,
        normal = anomaly_data.normal,
        abnormal = anomaly_data.abnormal,
        defaulted = ?records.defaulted(),
        "analysis complete"
    );

    Snapshot {
        protocol_counts,
        anomaly_data,
        additional_metrics,
        detailed_anomaly_data,
    }
}
