//! Fetch remote time-series data and store it locally

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::result::{Error, Result};
use crate::domain::Asset;
use crate::ports::{NetworkDataRepository, TimeSeriesRepository};

#[derive(Debug, Clone)]
pub struct ImportTimeSeriesRequest {
    pub instrument_id: String,
    /// Name for a newly created asset; defaults to the instrument id
    pub asset_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportTimeSeriesResponse {
    pub asset_id: String,
    pub fetched: usize,
    pub latest_timestamp_ms: Option<i64>,
}

pub struct ImportTimeSeriesInteractor {
    source: Arc<dyn NetworkDataRepository>,
    store: Arc<dyn TimeSeriesRepository>,
}

impl ImportTimeSeriesInteractor {
    pub fn new(
        source: Arc<dyn NetworkDataRepository>,
        store: Arc<dyn TimeSeriesRepository>,
    ) -> Self {
        Self { source, store }
    }

    pub fn execute(&self, request: ImportTimeSeriesRequest) -> Result<ImportTimeSeriesResponse> {
        let instrument_id = request.instrument_id.trim();
        if instrument_id.is_empty() {
            return Err(Error::validation("Instrument ID cannot be empty"));
        }

        let points = self.source.fetch_time_series_data(instrument_id)?;

        if self.store.get_asset(instrument_id)?.is_none() {
            let mut asset = Asset::new(
                instrument_id,
                request.asset_name.as_deref().unwrap_or(instrument_id),
            );
            asset.source = self.source.name().to_string();
            self.store.create_asset(&asset)?;
        }

        self.store.add_points(&points)?;

        let latest_timestamp_ms = points.iter().map(|p| p.timestamp_ms).max();
        info!(
            instrument_id,
            source = self.source.name(),
            fetched = points.len(),
            "time series imported"
        );

        Ok(ImportTimeSeriesResponse {
            asset_id: instrument_id.to_string(),
            fetched: points.len(),
            latest_timestamp_ms,
        })
    }
}
