//! Network data provider port
//!
//! Fetches time-series data for an instrument from a remote source. URL
//! layout, request shape and response parsing are the adapter's business.

use crate::domain::TimeSeriesPoint;
use crate::ports::http::NetworkError;

pub trait NetworkDataRepository: Send + Sync {
    /// Provider name (e.g., "ls-tc")
    fn name(&self) -> &str;

    /// Fetch points for `instrument_id`
    ///
    /// Order is whatever the source returns; callers must not assume sorting.
    fn fetch_time_series_data(
        &self,
        instrument_id: &str,
    ) -> Result<Vec<TimeSeriesPoint>, NetworkError>;
}
