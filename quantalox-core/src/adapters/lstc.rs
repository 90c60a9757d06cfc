//! ls-tc.de chart data gateway

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::domain::TimeSeriesPoint;
use crate::ports::http::{
    Headers, HttpClient, NetworkError, QueryParams, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_READ_TIMEOUT_SECS,
};
use crate::ports::NetworkDataRepository;

/// Provider name, also stored as the asset source
pub const LSTC_SOURCE: &str = "ls-tc";

pub const LSTC_DEFAULT_BASE_URL: &str = "https://www.ls-tc.de";

const CHART_PATH: &str = "/_rpc/json/instrument/chart/dataForInstrument";

const DEFAULT_MARKET_ID: &str = "1";
const DEFAULT_QUOTE_TYPE: &str = "last";
const DEFAULT_SERIES: &str = "intraday";
const DEFAULT_LOCALE_ID: &str = "2";

// Response shape: { "series": { "history": { "data": [[ts_seconds, price], ...] } } }

#[derive(Debug, Deserialize)]
struct ChartResponse {
    series: ChartSeries,
}

#[derive(Debug, Deserialize)]
struct ChartSeries {
    history: ChartHistory,
}

#[derive(Debug, Deserialize)]
struct ChartHistory {
    data: Vec<Vec<JsonValue>>,
}

/// Fetches intraday price history from ls-tc.de
pub struct LsTcDataRepository {
    client: Box<dyn HttpClient>,
    base_url: String,
}

impl LsTcDataRepository {
    /// Take ownership of `client` and configure it for the ls-tc endpoint
    ///
    /// Replaces the client's default headers and resets its timeouts to
    /// 10 s connect / 30 s read.
    pub fn new(mut client: Box<dyn HttpClient>, base_url: &str) -> Self {
        let mut headers = Headers::new();
        headers.insert(
            "User-Agent".to_string(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        );
        headers.insert(
            "Accept".to_string(),
            "application/json, text/plain, */*".to_string(),
        );
        headers.insert("Accept-Language".to_string(), "en-US,en;q=0.9".to_string());
        client.set_default_headers(headers);
        client.set_connect_timeout(DEFAULT_CONNECT_TIMEOUT_SECS);
        client.set_read_timeout(DEFAULT_READ_TIMEOUT_SECS);

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Override the timeouts applied in [`LsTcDataRepository::new`]
    pub fn set_timeouts(&mut self, connect_secs: u64, read_secs: u64) {
        self.client.set_connect_timeout(connect_secs);
        self.client.set_read_timeout(read_secs);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chart_url(&self) -> String {
        format!("{}{}", self.base_url, CHART_PATH)
    }

    fn query_params(instrument_id: &str) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert("instrumentId".to_string(), instrument_id.to_string());
        params.insert("marketId".to_string(), DEFAULT_MARKET_ID.to_string());
        params.insert("quotetype".to_string(), DEFAULT_QUOTE_TYPE.to_string());
        params.insert("series".to_string(), DEFAULT_SERIES.to_string());
        params.insert("localeId".to_string(), DEFAULT_LOCALE_ID.to_string());
        params
    }

    /// Parse a chart body into points, keeping the source order
    pub fn parse_response(
        instrument_id: &str,
        body: &str,
    ) -> Result<Vec<TimeSeriesPoint>, NetworkError> {
        let chart: ChartResponse = serde_json::from_str(body).map_err(|e| {
            NetworkError::InvalidResponse(format!(
                "Failed to parse chart data for {}: {}",
                instrument_id, e
            ))
        })?;

        let mut points = Vec::with_capacity(chart.series.history.data.len());
        for (idx, entry) in chart.series.history.data.iter().enumerate() {
            if entry.len() < 2 {
                warn!(instrument_id, idx, "skipping incomplete data point");
                continue;
            }

            let timestamp_ms = chart_timestamp_ms(&entry[0], idx)?;
            let price = entry[1].as_f64().ok_or_else(|| {
                NetworkError::InvalidResponse(format!(
                    "data point {} has non-numeric price {}",
                    idx, entry[1]
                ))
            })?;

            points.push(TimeSeriesPoint::new(instrument_id, timestamp_ms, "", price));
        }

        Ok(points)
    }
}

/// Convert a chart timestamp in seconds to milliseconds
///
/// Fractional seconds are truncated. Values whose millisecond form does not
/// fit in `i64` are rejected.
fn chart_timestamp_ms(value: &JsonValue, idx: usize) -> Result<i64, NetworkError> {
    let invalid = |reason: &str| {
        NetworkError::InvalidResponse(format!(
            "data point {} has {} timestamp {}",
            idx, reason, value
        ))
    };

    let seconds = match value.as_i64() {
        Some(secs) => secs,
        None => {
            let secs = value.as_f64().ok_or_else(|| invalid("non-numeric"))?;
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
            if !secs.is_finite() || secs < i64::MIN as f64 || secs >= i64::MAX as f64 {
                return Err(invalid("out-of-range"));
            }
            secs.trunc() as i64
        }
    };

    seconds
        .checked_mul(1000)
        .ok_or_else(|| invalid("out-of-range"))
}

impl NetworkDataRepository for LsTcDataRepository {
    fn name(&self) -> &str {
        LSTC_SOURCE
    }

    fn fetch_time_series_data(
        &self,
        instrument_id: &str,
    ) -> Result<Vec<TimeSeriesPoint>, NetworkError> {
        let response = self
            .client
            .get(&self.chart_url(), &Self::query_params(instrument_id))?;

        let points = Self::parse_response(instrument_id, response.body())?;
        debug!(instrument_id, count = points.len(), "fetched chart data");
        Ok(points)
    }
}
