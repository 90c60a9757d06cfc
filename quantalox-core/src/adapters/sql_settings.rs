//! SQL implementation of [`SettingsRepository`]

use std::sync::Arc;

use tracing::debug;

use crate::domain::result::Result;
use crate::domain::Setting;
use crate::ports::database::{expect_columns, optional_text, single_count, text, Database, DbRow};
use crate::ports::SettingsRepository;

pub struct SqlSettingsRepository {
    db: Arc<dyn Database>,
}

impl SqlSettingsRepository {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    pub fn initialize_schema(&self) -> Result<()> {
        self.db.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                description TEXT
            );",
        )?;
        debug!("settings schema initialized");
        Ok(())
    }

    fn map_setting(row: &DbRow) -> Result<Setting> {
        expect_columns(row, 3)?;
        Ok(Setting {
            key: text(row, 0)?,
            value: text(row, 1)?,
            description: optional_text(row, 2)?,
        })
    }

    fn map_key(row: &DbRow) -> Result<String> {
        text(row, 0)
    }
}

impl SettingsRepository for SqlSettingsRepository {
    fn set(&self, key: &str, value: &str, description: Option<&str>) -> Result<()> {
        self.db
            .prepare(
                "INSERT INTO settings (key, value, description) VALUES (?, ?, ?)
                 ON CONFLICT (key) DO UPDATE SET
                    value = EXCLUDED.value,
                    description = EXCLUDED.description",
            )
            .bind(key)
            .bind(value)
            .bind(description)
            .execute_update()?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Setting>> {
        let rows = self
            .db
            .prepare("SELECT key, value, description FROM settings WHERE key = ?")
            .bind(key)
            .execute()?;
        rows.first().map(Self::map_setting).transpose()
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        let rows = self
            .db
            .prepare("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .execute()?;
        rows.first().map(|row| text(row, 0)).transpose()
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let rows = self
            .db
            .prepare("SELECT 1 FROM settings WHERE key = ?")
            .bind(key)
            .execute()?;
        Ok(!rows.is_empty())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let removed = self
            .db
            .prepare("DELETE FROM settings WHERE key = ?")
            .bind(key)
            .execute_update()?;
        Ok(removed > 0)
    }

    fn get_all(&self) -> Result<Vec<Setting>> {
        let rows = self
            .db
            .query("SELECT key, value, description FROM settings ORDER BY key")?;
        rows.iter().map(Self::map_setting).collect()
    }

    fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Setting>> {
        let rows = self
            .db
            .prepare(
                "SELECT key, value, description FROM settings
                 WHERE starts_with(key, ?) ORDER BY key",
            )
            .bind(prefix)
            .execute()?;
        rows.iter().map(Self::map_setting).collect()
    }

    fn get_keys(&self) -> Result<Vec<String>> {
        let rows = self.db.query("SELECT key FROM settings ORDER BY key")?;
        rows.iter().map(Self::map_key).collect()
    }

    fn get_keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let rows = self
            .db
            .prepare("SELECT key FROM settings WHERE starts_with(key, ?) ORDER BY key")
            .bind(prefix)
            .execute()?;
        rows.iter().map(Self::map_key).collect()
    }

    fn remove_by_prefix(&self, prefix: &str) -> Result<usize> {
        self.db
            .prepare("DELETE FROM settings WHERE starts_with(key, ?)")
            .bind(prefix)
            .execute_update()
    }

    fn clear(&self) -> Result<usize> {
        self.db.prepare("DELETE FROM settings").execute_update()
    }

    fn count(&self) -> Result<i64> {
        single_count(&self.db.query("SELECT COUNT(*) FROM settings")?)
    }

    fn count_by_prefix(&self, prefix: &str) -> Result<i64> {
        let rows = self
            .db
            .prepare("SELECT COUNT(*) FROM settings WHERE starts_with(key, ?)")
            .bind(prefix)
            .execute()?;
        single_count(&rows)
    }
}
