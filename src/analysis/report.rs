//! Geo-tagged detail rows for abnormal records (alert view).

use super::anomalies::is_normal;
use crate::records::{Cell, Column, RecordSet};
use serde::{Deserialize, Serialize};

pub const DETAIL_COLUMNS: [Column; 5] = [
    Column::AnomalyType,
    Column::OriginCountry,
    Column::Latitude,
    Column::Longitude,
    Column::SeverityLevel,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnomaly {
    #[serde(rename = "Anomaly Type")]
    pub anomaly_type: Cell,
    #[serde(rename = "Origin Country")]
    pub origin_country: Cell,
    #[serde(rename = "Latitude")]
    pub latitude: Cell,
    #[serde(rename = "Longitude")]
    pub longitude: Cell,
    #[serde(rename = "Severity Level")]
    pub severity_level: Cell,
}

/// Completes the five detail columns with "N/A" for every record, then projects
/// them for abnormal records in source order. No label column, no rows.
pub fn detailed_anomalies(records: &mut RecordSet) -> Vec<DetailedAnomaly> {
    records.complete(&DETAIL_COLUMNS);
    let Some(labels) = records.text(Column::Class) else {
        return Vec::new();
    };
    let cell = |column: Column, row: usize| {
        records
            .cells(column)
            .and_then(|cells| cells.get(row))
            .cloned()
            .unwrap_or_else(Cell::not_available)
    };

    labels
        .iter()
        .enumerate()
        .filter(|(_, label)| !is_normal(label))
        .map(|(row, _)| DetailedAnomaly {
            anomaly_type: cell(Column::AnomalyType, row),
            origin_country: cell(Column::OriginCountry, row),
            latitude: cell(Column::Latitude, row),
            longitude: cell(Column::Longitude, row),
            severity_level: cell(Column::SeverityLevel, row),
        })
        .collect()
}
