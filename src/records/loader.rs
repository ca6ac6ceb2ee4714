//! CSV → RecordSet. Schema-on-read: each expected column is converted eagerly,
//! conversion failures abort the load.

use super::{Column, ColumnData, RecordSet};
use crate::error::{Error, Result};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Upload-path loader: parse, then guarantee the `class` label column
/// (absent labels mean every record is normal).
pub fn ingest(bytes: &[u8]) -> Result<RecordSet> {
    let mut records = RecordSet::from_reader(bytes)?;
    records.complete(&[Column::Class]);
    info!(
        records = records.len(),
        defaulted = ?records.defaulted(),
        "record set loaded"
    );
    Ok(records)
}

impl RecordSet {
    /// Parse delimited text with a header row. No columns are defaulted.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(rdr);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(Error::Parse("no columns to parse from input".to_string()));
        }

        // First occurrence of a duplicated header wins.
        let mut targets: Vec<(Column, usize, ColumnData)> = Vec::new();
        for (idx, name) in headers.iter().enumerate() {
            if let Some(column) = Column::from_name(name) {
                if !targets.iter().any(|(c, _, _)| *c == column) {
                    targets.push((column, idx, ColumnData::empty(column.kind())));
                }
            }
        }

        let mut len = 0usize;
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            for (column, idx, data) in targets.iter_mut() {
                let raw = record.get(*idx).unwrap_or("");
                data.push_raw(raw).ok_or_else(|| {
                    Error::Parse(format!(
                        "line {}: column `{}` expects a number, got {:?}",
                        line, column, raw
                    ))
                })?;
            }
            len += 1;
        }

        let mut records = RecordSet::with_len(len);
        for (column, _, data) in targets {
            records.insert(column, data)?;
        }
        Ok(records)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }
}
