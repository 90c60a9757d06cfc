//! Time-series repository tests against a real DuckDB database

use std::sync::Arc;

use quantalox_core::adapters::{DuckDbDatabase, SqlTimeSeriesRepository};
use quantalox_core::domain::result::Error;
use quantalox_core::domain::{Asset, TimeSeriesPoint, Unit, UnitConversion};
use quantalox_core::ports::{Database, TimeSeriesRepository};

fn create_test_repo() -> SqlTimeSeriesRepository {
    let db: Arc<dyn Database> = Arc::new(DuckDbDatabase::open_in_memory().unwrap());
    let repo = SqlTimeSeriesRepository::new(db);
    repo.initialize_schema().unwrap();
    repo
}

fn unit(id: &str, symbol: &str, name: &str) -> Unit {
    Unit {
        id: id.to_string(),
        symbol: symbol.to_string(),
        name: name.to_string(),
    }
}

fn conversion(from: &str, to: &str, factor: f64) -> UnitConversion {
    UnitConversion {
        from_unit_id: from.to_string(),
        to_unit_id: to.to_string(),
        factor,
    }
}

fn repo_with_prices() -> SqlTimeSeriesRepository {
    let repo = create_test_repo();
    repo.create_asset(&Asset::new("AAPL", "Apple")).unwrap();
    repo.create_unit(&unit("USD", "$", "US Dollar")).unwrap();
    repo.create_unit(&unit("EUR", "€", "Euro")).unwrap();
    repo.add_points(&[
        TimeSeriesPoint::new("AAPL", 3_000, "USD", 103.0),
        TimeSeriesPoint::new("AAPL", 1_000, "USD", 101.0),
        TimeSeriesPoint::new("AAPL", 2_000, "USD", 102.0),
        TimeSeriesPoint::new("AAPL", 2_000, "EUR", 94.0),
    ])
    .unwrap();
    repo
}

// ============================================================================
// Assets
// ============================================================================

#[test]
fn test_asset_crud() {
    let repo = create_test_repo();
    let mut asset = Asset::new("AAPL", "Apple");
    asset.description = "Apple Inc.".to_string();
    asset.source = "ls-tc".to_string();
    repo.create_asset(&asset).unwrap();

    assert_eq!(repo.get_asset("AAPL").unwrap(), Some(asset.clone()));

    asset.name = "Apple Inc".to_string();
    repo.update_asset(&asset).unwrap();
    assert_eq!(repo.get_asset("AAPL").unwrap().unwrap().name, "Apple Inc");

    assert!(repo.delete_asset("AAPL").unwrap());
    assert!(!repo.delete_asset("AAPL").unwrap());
    assert!(repo.get_asset("AAPL").unwrap().is_none());
}

#[test]
fn test_duplicate_asset_is_already_exists() {
    let repo = create_test_repo();
    repo.create_asset(&Asset::new("AAPL", "Apple")).unwrap();
    let err = repo.create_asset(&Asset::new("AAPL", "Again")).unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
}

#[test]
fn test_update_missing_asset_is_not_found() {
    let repo = create_test_repo();
    let err = repo.update_asset(&Asset::new("ghost", "Ghost")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_assets_ordered_by_name() {
    let repo = create_test_repo();
    repo.create_asset(&Asset::new("2", "Zeta")).unwrap();
    repo.create_asset(&Asset::new("1", "Alpha")).unwrap();

    let names: Vec<String> = repo
        .get_all_assets()
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);
}

#[test]
fn test_delete_asset_cascades_to_points() {
    let repo = repo_with_prices();
    assert!(repo.delete_asset("AAPL").unwrap());
    assert!(repo.get_points("AAPL", i64::MIN, i64::MAX).unwrap().is_empty());
}

// ============================================================================
// Units and conversions
// ============================================================================

#[test]
fn test_unit_crud() {
    let repo = create_test_repo();
    repo.create_unit(&unit("EUR", "€", "Euro")).unwrap();
    repo.update_unit(&unit("EUR", "EUR", "Euro")).unwrap();

    assert_eq!(repo.get_unit("EUR").unwrap().unwrap().symbol, "EUR");
    assert_eq!(repo.get_all_units().unwrap().len(), 1);
    assert!(matches!(
        repo.update_unit(&unit("GBP", "£", "Pound")),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_conversion_crud() {
    let repo = create_test_repo();
    repo.create_conversion(&conversion("USD", "EUR", 0.9)).unwrap();
    repo.create_conversion(&conversion("USD", "GBP", 0.8)).unwrap();
    repo.create_conversion(&conversion("EUR", "GBP", 0.85)).unwrap();

    assert_eq!(
        repo.get_conversion("USD", "EUR").unwrap(),
        Some(conversion("USD", "EUR", 0.9))
    );
    assert!(repo.get_conversion("EUR", "USD").unwrap().is_none());

    let from_usd: Vec<String> = repo
        .get_conversions_from("USD")
        .unwrap()
        .into_iter()
        .map(|c| c.to_unit_id)
        .collect();
    assert_eq!(from_usd, vec!["EUR", "GBP"]);
    assert_eq!(repo.get_all_conversions().unwrap().len(), 3);

    repo.update_conversion(&conversion("USD", "EUR", 0.95)).unwrap();
    assert_eq!(repo.get_conversion("USD", "EUR").unwrap().unwrap().factor, 0.95);

    assert!(repo.delete_conversion("USD", "EUR").unwrap());
    assert!(!repo.delete_conversion("USD", "EUR").unwrap());
}

#[test]
fn test_convert_directions() {
    let repo = create_test_repo();
    repo.create_conversion(&conversion("USD", "EUR", 0.5)).unwrap();
    repo.create_conversion(&conversion("XXX", "YYY", 0.0)).unwrap();

    assert_eq!(repo.convert(10.0, "USD", "USD").unwrap(), Some(10.0));
    assert_eq!(repo.convert(10.0, "USD", "EUR").unwrap(), Some(5.0));
    assert_eq!(repo.convert(10.0, "EUR", "USD").unwrap(), Some(20.0));
    assert_eq!(repo.convert(10.0, "USD", "GBP").unwrap(), None);
    // A zero reverse factor cannot be inverted
    assert_eq!(repo.convert(10.0, "YYY", "XXX").unwrap(), None);
}

#[test]
fn test_delete_unit_cascades() {
    let repo = repo_with_prices();
    repo.create_conversion(&conversion("USD", "EUR", 0.9)).unwrap();
    repo.create_conversion(&conversion("EUR", "USD", 1.1)).unwrap();

    assert!(repo.delete_unit("EUR").unwrap());
    assert!(repo.get_all_conversions().unwrap().is_empty());
    assert!(repo
        .get_points_in_unit("AAPL", "EUR", i64::MIN, i64::MAX)
        .unwrap()
        .is_empty());
    assert_eq!(
        repo.get_points_in_unit("AAPL", "USD", i64::MIN, i64::MAX)
            .unwrap()
            .len(),
        3
    );
}

// ============================================================================
// Points
// ============================================================================

#[test]
fn test_points_in_range_are_sorted_and_inclusive() {
    let repo = repo_with_prices();

    let usd = repo.get_points_in_unit("AAPL", "USD", 1_000, 2_000).unwrap();
    assert_eq!(
        usd,
        vec![
            TimeSeriesPoint::new("AAPL", 1_000, "USD", 101.0),
            TimeSeriesPoint::new("AAPL", 2_000, "USD", 102.0),
        ]
    );

    let all: Vec<i64> = repo
        .get_points("AAPL", 0, 10_000)
        .unwrap()
        .into_iter()
        .map(|p| p.timestamp_ms)
        .collect();
    assert_eq!(all, vec![1_000, 2_000, 2_000, 3_000]);
}

#[test]
fn test_add_point_overwrites_same_key() {
    let repo = repo_with_prices();
    repo.add_point(&TimeSeriesPoint::new("AAPL", 1_000, "USD", 99.5))
        .unwrap();

    let points = repo.get_points_in_unit("AAPL", "USD", 1_000, 1_000).unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].value, 99.5);
}

#[test]
fn test_points_with_empty_unit() {
    let repo = create_test_repo();
    repo.add_point(&TimeSeriesPoint::new("43763", 5_000, "", 12.5))
        .unwrap();

    let latest = repo.get_latest_point("43763").unwrap().unwrap();
    assert_eq!(latest.unit_id, "");
    assert_eq!(latest.value, 12.5);
}

#[test]
fn test_latest_point() {
    let repo = repo_with_prices();

    assert_eq!(repo.get_latest_point("AAPL").unwrap().unwrap().timestamp_ms, 3_000);
    assert_eq!(
        repo.get_latest_point_in_unit("AAPL", "EUR").unwrap(),
        Some(TimeSeriesPoint::new("AAPL", 2_000, "EUR", 94.0))
    );
    assert!(repo.get_latest_point("MSFT").unwrap().is_none());
}

#[test]
fn test_delete_points() {
    let repo = repo_with_prices();

    assert_eq!(repo.delete_points("AAPL", 2_000, 3_000).unwrap(), 3);
    assert_eq!(repo.get_points("AAPL", 0, 10_000).unwrap().len(), 1);
    assert_eq!(repo.delete_all_points("AAPL").unwrap(), 1);
    assert_eq!(repo.delete_all_points("AAPL").unwrap(), 0);
    assert!(repo.get_asset("AAPL").unwrap().is_some());
}
