//! Key/value settings port

use crate::domain::result::Result;
use crate::domain::Setting;

pub trait SettingsRepository: Send + Sync {
    /// Create or overwrite a setting
    fn set(&self, key: &str, value: &str, description: Option<&str>) -> Result<()>;

    fn put(&self, setting: &Setting) -> Result<()> {
        self.set(&setting.key, &setting.value, setting.description.as_deref())
    }

    fn get(&self, key: &str) -> Result<Option<Setting>>;

    fn get_value(&self, key: &str) -> Result<Option<String>>;

    fn exists(&self, key: &str) -> Result<bool>;

    fn remove(&self, key: &str) -> Result<bool>;

    /// All settings ordered by key
    fn get_all(&self) -> Result<Vec<Setting>>;

    fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Setting>>;

    fn get_keys(&self) -> Result<Vec<String>>;

    fn get_keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    fn remove_by_prefix(&self, prefix: &str) -> Result<usize>;

    fn clear(&self) -> Result<usize>;

    fn count(&self) -> Result<i64>;

    fn count_by_prefix(&self, prefix: &str) -> Result<i64>;
}
