//! Holder for the latest analysis result. Each upload installs a complete
//! snapshot with one replace; readers never see parts of two uploads.

use super::alert::{alert_channel, Alert};
use crate::analysis::{analyze, Snapshot};
use crate::records::RecordSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Provenance of the installed snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadInfo {
    pub id: String,
    pub file_name: String,
    pub records: usize,
    pub sha256: String,
    pub received_at: DateTime<Utc>,
}

impl UploadInfo {
    pub fn new(file_name: impl Into<String>, bytes: &[u8], records: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            records,
            sha256: format!("{:x}", Sha256::digest(bytes)),
            received_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
struct Installed {
    snapshot: Arc<Snapshot>,
    upload: Option<UploadInfo>,
}

#[derive(Debug)]
pub struct SnapshotStore {
    inner: RwLock<Installed>,
    alerts: broadcast::Sender<Alert>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::with_alerts(alert_channel())
    }
}

impl SnapshotStore {
    /// Store holding the zero-state snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that publishes anomaly alerts on `alerts`.
    pub fn with_alerts(alerts: broadcast::Sender<Alert>) -> Self {
        Self {
            inner: RwLock::default(),
            alerts,
        }
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<Alert> {
        self.alerts.subscribe()
    }

    /// Analyze the record set and replace the current snapshot with the result.
    /// Publishes one alert when the new snapshot has abnormal records.
    pub fn process_upload(&self, records: RecordSet, upload: Option<UploadInfo>) -> Arc<Snapshot> {
        let snapshot = Arc::new(analyze(records));
        let upload_id = upload.as_ref().map(|u| u.id.clone());
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.snapshot = Arc::clone(&snapshot);
        inner.upload = upload;
        drop(inner);
        tracing::info!("snapshot replaced");

        if let Some(alert) = Alert::for_snapshot(&snapshot, upload_id) {
            match self.alerts.send(alert) {
                Ok(receivers) => tracing::warn!(
                    abnormal = snapshot.anomaly_data.abnormal,
                    receivers,
                    "anomaly alert published"
                ),
                Err(_) => tracing::debug!("anomaly alert dropped, no subscribers"),
            }
        }
        snapshot
    }

    pub fn current(&self) -> Arc<Snapshot> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&inner.snapshot)
    }

    pub fn last_upload(&self) -> Option<UploadInfo> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.upload.clone()
    }
}
