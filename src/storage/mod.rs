//! In-memory storage of the latest computed snapshot, plus its anomaly alert feed.

mod alert;
mod snapshot;

pub use alert::{alert_channel, Alert, ALERT_BUFFER, ANOMALY_ALERT_MESSAGE};
pub use snapshot::{SnapshotStore, UploadInfo};
