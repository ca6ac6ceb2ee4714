//! Expected columns, their declared kinds, and typed cell values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every column the pipeline reads. Anything else in the source is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    ProtocolType,
    Class,
    Duration,
    SrcBytes,
    DstBytes,
    AnomalyType,
    OriginCountry,
    Latitude,
    Longitude,
    SeverityLevel,
}

/// Declared type of a column, applied when the source is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Raw text, kept verbatim (labels are compared without trimming)
    Text,
    /// Integer or finite float; conversion failure is a parse error
    Numeric,
    /// Free descriptive cell: number, text or empty
    Cell,
}

/// Sentinel written into descriptive columns absent from the source.
pub const NOT_AVAILABLE: &str = "N/A";

/// Label value that marks a record as normal traffic.
pub const NORMAL_LABEL: &str = "normal";

impl Column {
    pub const ALL: [Column; 10] = [
        Column::ProtocolType,
        Column::Class,
        Column::Duration,
        Column::SrcBytes,
        Column::DstBytes,
        Column::AnomalyType,
        Column::OriginCountry,
        Column::Latitude,
        Column::Longitude,
        Column::SeverityLevel,
    ];

    /// Header name in the source CSV
    pub fn name(self) -> &'static str {
        match self {
            Column::ProtocolType => "protocol_type",
            Column::Class => "class",
            Column::Duration => "duration",
            Column::SrcBytes => "src_bytes",
            Column::DstBytes => "dst_bytes",
            Column::AnomalyType => "Anomaly Type",
            Column::OriginCountry => "Origin Country",
            Column::Latitude => "Latitude",
            Column::Longitude => "Longitude",
            Column::SeverityLevel => "Severity Level",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::ProtocolType | Column::Class => ColumnKind::Text,
            Column::Duration | Column::SrcBytes | Column::DstBytes => ColumnKind::Numeric,
            Column::AnomalyType
            | Column::OriginCountry
            | Column::Latitude
            | Column::Longitude
            | Column::SeverityLevel => ColumnKind::Cell,
        }
    }

    /// Column filled with this column's default value for `len` records.
    pub fn default_data(self, len: usize) -> ColumnData {
        match self {
            Column::Class => ColumnData::Text(vec![NORMAL_LABEL.to_string(); len]),
            Column::ProtocolType => ColumnData::Text(vec!["other".to_string(); len]),
            Column::Duration | Column::SrcBytes | Column::DstBytes => {
                ColumnData::Numeric(vec![Numeric::ZERO; len])
            }
            _ => ColumnData::Cell(vec![Cell::not_available(); len]),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric cell. Integers stay integers so values pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub const ZERO: Numeric = Numeric::Int(0);

    /// Integer first, then finite float. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Option<Numeric> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(v) = s.parse::<i64>() {
            return Some(Numeric::Int(v));
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(Numeric::Float(v)),
            _ => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(v) => v as f64,
            Numeric::Float(v) => v,
        }
    }
}

/// Descriptive cell, serialized as a bare JSON number, string or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(Numeric),
    Text(String),
    Empty,
}

impl Cell {
    pub fn parse(raw: &str) -> Cell {
        if raw.trim().is_empty() {
            return Cell::Empty;
        }
        match Numeric::parse(raw) {
            Some(n) => Cell::Number(n),
            None => Cell::Text(raw.to_string()),
        }
    }

    pub fn not_available() -> Cell {
        Cell::Text(NOT_AVAILABLE.to_string())
    }
}

/// One column's values, typed by its [`ColumnKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Text(Vec<String>),
    Numeric(Vec<Numeric>),
    Cell(Vec<Cell>),
}

impl ColumnData {
    pub fn empty(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Text => ColumnData::Text(Vec::new()),
            ColumnKind::Numeric => ColumnData::Numeric(Vec::new()),
            ColumnKind::Cell => ColumnData::Cell(Vec::new()),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Text(_) => ColumnKind::Text,
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Cell(_) => ColumnKind::Cell,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Cell(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert and append one raw source cell. `None` means the cell is not a number
    /// in a numeric column.
    pub(crate) fn push_raw(&mut self, raw: &str) -> Option<()> {
        match self {
            ColumnData::Text(v) => v.push(raw.to_string()),
            ColumnData::Numeric(v) => v.push(Numeric::parse(raw)?),
            ColumnData::Cell(v) => v.push(Cell::parse(raw)),
        }
        Some(())
    }
}
