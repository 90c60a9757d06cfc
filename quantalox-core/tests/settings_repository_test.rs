//! Settings repository tests against a real DuckDB database

use std::sync::Arc;

use quantalox_core::adapters::{DuckDbDatabase, SqlSettingsRepository};
use quantalox_core::domain::Setting;
use quantalox_core::ports::{Database, SettingsRepository};

fn create_test_repo() -> SqlSettingsRepository {
    let db: Arc<dyn Database> = Arc::new(DuckDbDatabase::open_in_memory().unwrap());
    let repo = SqlSettingsRepository::new(db);
    repo.initialize_schema().unwrap();
    repo
}

fn seeded_repo() -> SqlSettingsRepository {
    let repo = create_test_repo();
    repo.set("ui.theme", "dark", None).unwrap();
    repo.set("ui.lang", "en", Some("Display language")).unwrap();
    repo.set("api.timeout", "30", None).unwrap();
    repo
}

#[test]
fn test_set_and_get() {
    let repo = create_test_repo();
    repo.set("ui.theme", "dark", Some("Theme")).unwrap();

    let setting = repo.get("ui.theme").unwrap().unwrap();
    assert_eq!(setting.value, "dark");
    assert_eq!(setting.description.as_deref(), Some("Theme"));
    assert_eq!(repo.get_value("ui.theme").unwrap().as_deref(), Some("dark"));
    assert!(repo.exists("ui.theme").unwrap());
}

#[test]
fn test_put_overwrites() {
    let repo = create_test_repo();
    repo.put(&Setting::new("k", "v1")).unwrap();
    repo.put(&Setting::new("k", "v2")).unwrap();

    assert_eq!(repo.get_value("k").unwrap().as_deref(), Some("v2"));
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn test_missing_setting_is_none() {
    let repo = create_test_repo();
    assert!(repo.get("missing").unwrap().is_none());
    assert!(repo.get_value("missing").unwrap().is_none());
    assert!(!repo.exists("missing").unwrap());
}

#[test]
fn test_remove() {
    let repo = seeded_repo();
    assert!(repo.remove("ui.theme").unwrap());
    assert!(!repo.remove("ui.theme").unwrap());
    assert_eq!(repo.count().unwrap(), 2);
}

#[test]
fn test_get_all_and_keys_are_sorted() {
    let repo = seeded_repo();

    let keys: Vec<String> = repo.get_all().unwrap().into_iter().map(|s| s.key).collect();
    assert_eq!(keys, vec!["api.timeout", "ui.lang", "ui.theme"]);
    assert_eq!(repo.get_keys().unwrap(), keys);
}

#[test]
fn test_prefix_operations() {
    let repo = seeded_repo();

    let ui: Vec<String> = repo
        .get_by_prefix("ui.")
        .unwrap()
        .into_iter()
        .map(|s| s.key)
        .collect();
    assert_eq!(ui, vec!["ui.lang", "ui.theme"]);
    assert_eq!(repo.get_keys_by_prefix("ui.").unwrap(), ui);
    assert_eq!(repo.count_by_prefix("ui.").unwrap(), 2);
    assert_eq!(repo.count_by_prefix("u_.").unwrap(), 0);

    assert_eq!(repo.remove_by_prefix("ui.").unwrap(), 2);
    assert_eq!(repo.get_keys().unwrap(), vec!["api.timeout"]);
}

#[test]
fn test_clear() {
    let repo = seeded_repo();
    assert_eq!(repo.clear().unwrap(), 3);
    assert_eq!(repo.count().unwrap(), 0);
    assert_eq!(repo.clear().unwrap(), 0);
}
