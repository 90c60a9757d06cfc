//! Time-series storage port
//!
//! Assets, units, unit conversions and the points that reference them.
//! Time ranges are inclusive on both ends and expressed in Unix milliseconds.

use crate::domain::result::Result;
use crate::domain::{Asset, TimeSeriesPoint, Unit, UnitConversion};

pub trait TimeSeriesRepository: Send + Sync {
    // === Assets ===

    fn create_asset(&self, asset: &Asset) -> Result<()>;
    fn get_asset(&self, id: &str) -> Result<Option<Asset>>;
    fn get_all_assets(&self) -> Result<Vec<Asset>>;
    fn update_asset(&self, asset: &Asset) -> Result<()>;
    /// Also removes the asset's points
    fn delete_asset(&self, id: &str) -> Result<bool>;

    // === Units ===

    fn create_unit(&self, unit: &Unit) -> Result<()>;
    fn get_unit(&self, id: &str) -> Result<Option<Unit>>;
    fn get_all_units(&self) -> Result<Vec<Unit>>;
    fn update_unit(&self, unit: &Unit) -> Result<()>;
    /// Also removes conversions and points expressed in this unit
    fn delete_unit(&self, id: &str) -> Result<bool>;

    // === Unit conversions ===

    fn create_conversion(&self, conversion: &UnitConversion) -> Result<()>;
    fn get_conversion(&self, from_unit_id: &str, to_unit_id: &str)
        -> Result<Option<UnitConversion>>;
    fn get_conversions_from(&self, from_unit_id: &str) -> Result<Vec<UnitConversion>>;
    fn get_all_conversions(&self) -> Result<Vec<UnitConversion>>;
    fn update_conversion(&self, conversion: &UnitConversion) -> Result<()>;
    fn delete_conversion(&self, from_unit_id: &str, to_unit_id: &str) -> Result<bool>;

    // === Points ===

    /// Insert or overwrite by (asset, timestamp, unit)
    fn add_point(&self, point: &TimeSeriesPoint) -> Result<()>;

    fn add_points(&self, points: &[TimeSeriesPoint]) -> Result<()> {
        for point in points {
            self.add_point(point)?;
        }
        Ok(())
    }

    /// Points in `[from_ms, to_ms]`, oldest first
    fn get_points(&self, asset_id: &str, from_ms: i64, to_ms: i64)
        -> Result<Vec<TimeSeriesPoint>>;

    fn get_points_in_unit(
        &self,
        asset_id: &str,
        unit_id: &str,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<Vec<TimeSeriesPoint>>;

    fn get_latest_point(&self, asset_id: &str) -> Result<Option<TimeSeriesPoint>>;

    fn get_latest_point_in_unit(
        &self,
        asset_id: &str,
        unit_id: &str,
    ) -> Result<Option<TimeSeriesPoint>>;

    fn delete_points(&self, asset_id: &str, from_ms: i64, to_ms: i64) -> Result<usize>;

    fn delete_all_points(&self, asset_id: &str) -> Result<usize>;

    // === Conversion ===

    /// Convert using a direct factor, else the inverse of a reverse factor
    ///
    /// `None` when neither direction is known (or the reverse factor is zero).
    fn convert(&self, value: f64, from_unit_id: &str, to_unit_id: &str) -> Result<Option<f64>> {
        if from_unit_id == to_unit_id {
            return Ok(Some(value));
        }

        if let Some(conversion) = self.get_conversion(from_unit_id, to_unit_id)? {
            return Ok(Some(value * conversion.factor));
        }

        match self.get_conversion(to_unit_id, from_unit_id)? {
            Some(reverse) if reverse.factor != 0.0 => Ok(Some(value / reverse.factor)),
            _ => Ok(None),
        }
    }
}
