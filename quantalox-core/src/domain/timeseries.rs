//! Time-series domain models

use serde::{Deserialize, Serialize};

/// An instrument or other measured thing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Where points for this asset come from (e.g. "ls-tc")
    #[serde(default)]
    pub source: String,
}

impl Asset {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            source: String::new(),
        }
    }
}

/// Unit of measure, e.g. id "EUR", symbol "€"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// `to = from * factor`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConversion {
    pub from_unit_id: String,
    pub to_unit_id: String,
    pub factor: f64,
}

/// One observation of an asset
///
/// `unit_id` is empty when the source does not report a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub asset_id: String,
    /// Unix milliseconds
    pub timestamp_ms: i64,
    pub unit_id: String,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(
        asset_id: impl Into<String>,
        timestamp_ms: i64,
        unit_id: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            timestamp_ms,
            unit_id: unit_id.into(),
            value,
        }
    }
}
