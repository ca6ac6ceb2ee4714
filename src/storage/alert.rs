//! Anomaly alerts pushed to live subscribers when an upload contains abnormal traffic.

use crate::analysis::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Alerts buffered per subscriber before the slowest one starts lagging.
pub const ALERT_BUFFER: usize = 64;

pub const ANOMALY_ALERT_MESSAGE: &str =
    "Anomalies detected within your data. Please check the Alert System tab.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub severity: String,
    pub abnormal: u64,
    pub records: u64,
    pub upload_id: Option<String>,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    /// `None` when the snapshot has no abnormal records.
    pub fn for_snapshot(snapshot: &Snapshot, upload_id: Option<String>) -> Option<Alert> {
        let counts = &snapshot.anomaly_data;
        if counts.abnormal == 0 {
            return None;
        }
        Some(Alert {
            message: ANOMALY_ALERT_MESSAGE.to_string(),
            severity: "error".to_string(),
            abnormal: counts.abnormal,
            records: counts.normal + counts.abnormal,
            upload_id,
            raised_at: Utc::now(),
        })
    }
}

pub fn alert_channel() -> broadcast::Sender<Alert> {
    let (tx, _) = broadcast::channel(ALERT_BUFFER);
    tx
}
