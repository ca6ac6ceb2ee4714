//! Record sets: the typed, columnar in-memory form of one uploaded CSV.

mod column;
mod loader;

pub use column::{Cell, Column, ColumnData, ColumnKind, Numeric, NORMAL_LABEL, NOT_AVAILABLE};
pub use loader::ingest;

use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Ordered records stored column-wise. Only expected columns are kept;
/// every stored column holds exactly `len` values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    len: usize,
    columns: BTreeMap<Column, ColumnData>,
    defaulted: Vec<Column>,
}

impl RecordSet {
    /// Record set of `len` records with no columns yet.
    pub fn with_len(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn has(&self, column: Column) -> bool {
        self.columns.contains_key(&column)
    }

    /// Columns synthesized by [`RecordSet::complete`] so far, in completion order.
    pub fn defaulted(&self) -> &[Column] {
        &self.defaulted
    }

    /// Add or replace a column. Kind and length must match.
    pub fn insert(&mut self, column: Column, data: ColumnData) -> Result<()> {
        if data.kind() != column.kind() {
            return Err(Error::Validation(format!(
                "column `{}` expects {:?} values, got {:?}",
                column,
                column.kind(),
                data.kind()
            )));
        }
        if data.len() != self.len {
            return Err(Error::Validation(format!(
                "column `{}` has {} values, record set has {}",
                column,
                data.len(),
                self.len
            )));
        }
        self.columns.insert(column, data);
        Ok(())
    }

    /// Column completion: synthesize each absent column with its default value.
    /// Returns the columns that were defaulted by this call.
    pub fn complete(&mut self, columns: &[Column]) -> Vec<Column> {
        let mut added = Vec::new();
        for &column in columns {
            if self.columns.contains_key(&column) {
                continue;
            }
            self.columns.insert(column, column.default_data(self.len));
            self.defaulted.push(column);
            added.push(column);
        }
        if !added.is_empty() {
            tracing::debug!(columns = ?added, records = self.len, "defaulted missing columns");
        }
        added
    }

    pub fn text(&self, column: Column) -> Option<&[String]> {
        match self.columns.get(&column)? {
            ColumnData::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, column: Column) -> Option<&mut Vec<String>> {
        match self.columns.get_mut(&column)? {
            ColumnData::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn numeric(&self, column: Column) -> Option<&[Numeric]> {
        match self.columns.get(&column)? {
            ColumnData::Numeric(v) => Some(v),
            _ => None,
        }
    }

    pub fn cells(&self, column: Column) -> Option<&[Cell]> {
        match self.columns.get(&column)? {
            ColumnData::Cell(v) => Some(v),
            _ => None,
        }
    }
}
