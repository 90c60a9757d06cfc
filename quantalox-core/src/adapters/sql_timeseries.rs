//! SQL implementation of [`TimeSeriesRepository`]

use std::sync::Arc;

use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::{Asset, TimeSeriesPoint, Unit, UnitConversion};
use crate::ports::database::{expect_columns, integer, real, text, Database, DbRow};
use crate::ports::TimeSeriesRepository;

const POINT_COLUMNS: &str = "asset_id, timestamp_ms, unit_id, value";

pub struct SqlTimeSeriesRepository {
    db: Arc<dyn Database>,
}

impl SqlTimeSeriesRepository {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Create tables and indexes if they do not exist yet
    ///
    /// Deletes cascade explicitly in `delete_asset` / `delete_unit`.
    pub fn initialize_schema(&self) -> Result<()> {
        self.db.execute(
            "CREATE TABLE IF NOT EXISTS assets (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                source TEXT NOT NULL DEFAULT ''
            );
            CREATE TABLE IF NOT EXISTS units (
                id TEXT PRIMARY KEY,
                symbol TEXT NOT NULL,
                name TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS unit_conversions (
                from_unit_id TEXT NOT NULL,
                to_unit_id TEXT NOT NULL,
                factor DOUBLE NOT NULL,
                PRIMARY KEY (from_unit_id, to_unit_id)
            );
            CREATE TABLE IF NOT EXISTS timeseries (
                asset_id TEXT NOT NULL,
                timestamp_ms BIGINT NOT NULL,
                unit_id TEXT NOT NULL,
                value DOUBLE NOT NULL,
                PRIMARY KEY (asset_id, timestamp_ms, unit_id)
            );
            CREATE INDEX IF NOT EXISTS idx_timeseries_asset_time
                ON timeseries(asset_id, timestamp_ms);",
        )?;
        debug!("timeseries schema initialized");
        Ok(())
    }

    fn map_asset(row: &DbRow) -> Result<Asset> {
        expect_columns(row, 4)?;
        Ok(Asset {
            id: text(row, 0)?,
            name: text(row, 1)?,
            description: text(row, 2)?,
            source: text(row, 3)?,
        })
    }

    fn map_unit(row: &DbRow) -> Result<Unit> {
        expect_columns(row, 3)?;
        Ok(Unit {
            id: text(row, 0)?,
            symbol: text(row, 1)?,
            name: text(row, 2)?,
        })
    }

    fn map_conversion(row: &DbRow) -> Result<UnitConversion> {
        expect_columns(row, 3)?;
        Ok(UnitConversion {
            from_unit_id: text(row, 0)?,
            to_unit_id: text(row, 1)?,
            factor: real(row, 2)?,
        })
    }

    fn map_point(row: &DbRow) -> Result<TimeSeriesPoint> {
        // 0: asset_id, 1: timestamp_ms, 2: unit_id, 3: value
        expect_columns(row, 4)?;
        Ok(TimeSeriesPoint {
            asset_id: text(row, 0)?,
            timestamp_ms: integer(row, 1)?,
            unit_id: text(row, 2)?,
            value: real(row, 3)?,
        })
    }
}

fn conflict_as_already_exists(err: Error, what: String) -> Error {
    match err {
        Error::Constraint(_) => Error::AlreadyExists(what),
        other => other,
    }
}

fn require_updated(updated: usize, what: String) -> Result<()> {
    if updated == 0 {
        return Err(Error::not_found(what));
    }
    Ok(())
}

impl TimeSeriesRepository for SqlTimeSeriesRepository {
    // === Assets ===

    fn create_asset(&self, asset: &Asset) -> Result<()> {
        self.db
            .prepare("INSERT INTO assets (id, name, description, source) VALUES (?, ?, ?, ?)")
            .bind(&asset.id)
            .bind(&asset.name)
            .bind(&asset.description)
            .bind(&asset.source)
            .execute_update()
            .map_err(|e| conflict_as_already_exists(e, format!("asset '{}'", asset.id)))?;
        Ok(())
    }

    fn get_asset(&self, id: &str) -> Result<Option<Asset>> {
        let rows = self
            .db
            .prepare("SELECT id, name, description, source FROM assets WHERE id = ?")
            .bind(id)
            .execute()?;
        rows.first().map(Self::map_asset).transpose()
    }

    fn get_all_assets(&self) -> Result<Vec<Asset>> {
        let rows = self
            .db
            .query("SELECT id, name, description, source FROM assets ORDER BY name")?;
        rows.iter().map(Self::map_asset).collect()
    }

    fn update_asset(&self, asset: &Asset) -> Result<()> {
        let updated = self
            .db
            .prepare("UPDATE assets SET name = ?, description = ?, source = ? WHERE id = ?")
            .bind(&asset.name)
            .bind(&asset.description)
            .bind(&asset.source)
            .bind(&asset.id)
            .execute_update()?;
        require_updated(updated, format!("asset '{}'", asset.id))
    }

    fn delete_asset(&self, id: &str) -> Result<bool> {
        self.delete_all_points(id)?;
        let removed = self
            .db
            .prepare("DELETE FROM assets WHERE id = ?")
            .bind(id)
            .execute_update()?;
        Ok(removed > 0)
    }

    // === Units ===

    fn create_unit(&self, unit: &Unit) -> Result<()> {
        self.db
            .prepare("INSERT INTO units (id, symbol, name) VALUES (?, ?, ?)")
            .bind(&unit.id)
            .bind(&unit.symbol)
            .bind(&unit.name)
            .execute_update()
            .map_err(|e| conflict_as_already_exists(e, format!("unit '{}'", unit.id)))?;
        Ok(())
    }

    fn get_unit(&self, id: &str) -> Result<Option<Unit>> {
        let rows = self
            .db
            .prepare("SELECT id, symbol, name FROM units WHERE id = ?")
            .bind(id)
            .execute()?;
        rows.first().map(Self::map_unit).transpose()
    }

    fn get_all_units(&self) -> Result<Vec<Unit>> {
        let rows = self
            .db
            .query("SELECT id, symbol, name FROM units ORDER BY name")?;
        rows.iter().map(Self::map_unit).collect()
    }

    fn update_unit(&self, unit: &Unit) -> Result<()> {
        let updated = self
            .db
            .prepare("UPDATE units SET symbol = ?, name = ? WHERE id = ?")
            .bind(&unit.symbol)
            .bind(&unit.name)
            .bind(&unit.id)
            .execute_update()?;
        require_updated(updated, format!("unit '{}'", unit.id))
    }

    fn delete_unit(&self, id: &str) -> Result<bool> {
        self.db
            .prepare("DELETE FROM unit_conversions WHERE from_unit_id = ? OR to_unit_id = ?")
            .bind(id)
            .bind(id)
            .execute_update()?;
        self.db
            .prepare("DELETE FROM timeseries WHERE unit_id = ?")
            .bind(id)
            .execute_update()?;

        let removed = self
            .db
            .prepare("DELETE FROM units WHERE id = ?")
            .bind(id)
            .execute_update()?;
        Ok(removed > 0)
    }

    // === Unit conversions ===

    fn create_conversion(&self, conversion: &UnitConversion) -> Result<()> {
        self.db
            .prepare("INSERT INTO unit_conversions (from_unit_id, to_unit_id, factor) VALUES (?, ?, ?)")
            .bind(&conversion.from_unit_id)
            .bind(&conversion.to_unit_id)
            .bind(conversion.factor)
            .execute_update()
            .map_err(|e| {
                conflict_as_already_exists(
                    e,
                    format!(
                        "conversion {} -> {}",
                        conversion.from_unit_id, conversion.to_unit_id
                    ),
                )
            })?;
        Ok(())
    }

    fn get_conversion(
        &self,
        from_unit_id: &str,
        to_unit_id: &str,
    ) -> Result<Option<UnitConversion>> {
        let rows = self
            .db
            .prepare(
                "SELECT from_unit_id, to_unit_id, factor FROM unit_conversions
                 WHERE from_unit_id = ? AND to_unit_id = ?",
            )
            .bind(from_unit_id)
            .bind(to_unit_id)
            .execute()?;
        rows.first().map(Self::map_conversion).transpose()
    }

    fn get_conversions_from(&self, from_unit_id: &str) -> Result<Vec<UnitConversion>> {
        let rows = self
            .db
            .prepare(
                "SELECT from_unit_id, to_unit_id, factor FROM unit_conversions
                 WHERE from_unit_id = ? ORDER BY to_unit_id",
            )
            .bind(from_unit_id)
            .execute()?;
        rows.iter().map(Self::map_conversion).collect()
    }

    fn get_all_conversions(&self) -> Result<Vec<UnitConversion>> {
        let rows = self.db.query(
            "SELECT from_unit_id, to_unit_id, factor FROM unit_conversions
             ORDER BY from_unit_id, to_unit_id",
        )?;
        rows.iter().map(Self::map_conversion).collect()
    }

    fn update_conversion(&self, conversion: &UnitConversion) -> Result<()> {
        let updated = self
            .db
            .prepare(
                "UPDATE unit_conversions SET factor = ?
                 WHERE from_unit_id = ? AND to_unit_id = ?",
            )
            .bind(conversion.factor)
            .bind(&conversion.from_unit_id)
            .bind(&conversion.to_unit_id)
            .execute_update()?;
        require_updated(
            updated,
            format!(
                "conversion {} -> {}",
                conversion.from_unit_id, conversion.to_unit_id
            ),
        )
    }

    fn delete_conversion(&self, from_unit_id: &str, to_unit_id: &str) -> Result<bool> {
        let removed = self
            .db
            .prepare("DELETE FROM unit_conversions WHERE from_unit_id = ? AND to_unit_id = ?")
            .bind(from_unit_id)
            .bind(to_unit_id)
            .execute_update()?;
        Ok(removed > 0)
    }

    // === Points ===

    fn add_point(&self, point: &TimeSeriesPoint) -> Result<()> {
        self.db
            .prepare(&format!(
                "INSERT INTO timeseries ({}) VALUES (?, ?, ?, ?)
                 ON CONFLICT (asset_id, timestamp_ms, unit_id) DO UPDATE SET
                    value = EXCLUDED.value",
                POINT_COLUMNS
            ))
            .bind(&point.asset_id)
            .bind(point.timestamp_ms)
            .bind(&point.unit_id)
            .bind(point.value)
            .execute_update()?;
        Ok(())
    }

    fn get_points(
        &self,
        asset_id: &str,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<Vec<TimeSeriesPoint>> {
        let rows = self
            .db
            .prepare(&format!(
                "SELECT {} FROM timeseries
                 WHERE asset_id = ? AND timestamp_ms >= ? AND timestamp_ms <= ?
                 ORDER BY timestamp_ms, unit_id",
                POINT_COLUMNS
            ))
            .bind(asset_id)
            .bind(from_ms)
            .bind(to_ms)
            .execute()?;
        rows.iter().map(Self::map_point).collect()
    }

    fn get_points_in_unit(
        &self,
        asset_id: &str,
        unit_id: &str,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<Vec<TimeSeriesPoint>> {
        let rows = self
            .db
            .prepare(&format!(
                "SELECT {} FROM timeseries
                 WHERE asset_id = ? AND unit_id = ?
                   AND timestamp_ms >= ? AND timestamp_ms <= ?
                 ORDER BY timestamp_ms",
                POINT_COLUMNS
            ))
            .bind(asset_id)
            .bind(unit_id)
            .bind(from_ms)
            .bind(to_ms)
            .execute()?;
        rows.iter().map(Self::map_point).collect()
    }

    fn get_latest_point(&self, asset_id: &str) -> Result<Option<TimeSeriesPoint>> {
        let rows = self
            .db
            .prepare(&format!(
                "SELECT {} FROM timeseries WHERE asset_id = ?
                 ORDER BY timestamp_ms DESC LIMIT 1",
                POINT_COLUMNS
            ))
            .bind(asset_id)
            .execute()?;
        rows.first().map(Self::map_point).transpose()
    }

    fn get_latest_point_in_unit(
        &self,
        asset_id: &str,
        unit_id: &str,
    ) -> Result<Option<TimeSeriesPoint>> {
        let rows = self
            .db
            .prepare(&format!(
                "SELECT {} FROM timeseries WHERE asset_id = ? AND unit_id = ?
                 ORDER BY timestamp_ms DESC LIMIT 1",
                POINT_COLUMNS
            ))
            .bind(asset_id)
            .bind(unit_id)
            .execute()?;
        rows.first().map(Self::map_point).transpose()
    }

    fn delete_points(&self, asset_id: &str, from_ms: i64, to_ms: i64) -> Result<usize> {
        self.db
            .prepare(
                "DELETE FROM timeseries
                 WHERE asset_id = ? AND timestamp_ms >= ? AND timestamp_ms <= ?",
            )
            .bind(asset_id)
            .bind(from_ms)
            .bind(to_ms)
            .execute_update()
    }

    fn delete_all_points(&self, asset_id: &str) -> Result<usize> {
        self.db
            .prepare("DELETE FROM timeseries WHERE asset_id = ?")
            .bind(asset_id)
            .execute_update()
    }
}
