//! Quantalox Core - persistence and gateway core for portfolio management
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Account, User, TimeSeriesPoint, etc.)
//! - **ports**: Trait definitions for external dependencies (repositories, HTTP)
//! - **services**: Use case interactors
//! - **adapters**: Concrete implementations (DuckDB, SQL repositories, reqwest, ls-tc)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::{
    DuckDbDatabase, LsTcDataRepository, ReqwestHttpClient, SqlAccountRepository,
    SqlSettingsRepository, SqlTimeSeriesRepository, SqlUserRepository,
};
use config::Config;
use ports::{
    AccountRepository, Database, NetworkDataRepository, SettingsRepository,
    TimeSeriesRepository, UserRepository,
};
use services::{CreateAccountInteractor, ImportTimeSeriesInteractor, StatusService};

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result as CoreResult};
pub use domain::{
    Account, AccountProperty, Asset, Setting, TimeSeriesPoint, Unit, UnitConversion, User,
};
pub use ports::NetworkError;

/// Main context for Quantalox operations
///
/// Owns the database handle and wires every adapter and interactor on top of
/// it. Adapters hold clones of the same `Arc<dyn Database>`.
pub struct QuantaloxContext {
    pub config: Config,
    pub db_path: Option<PathBuf>,
    pub database: Arc<dyn Database>,
    pub accounts: Arc<dyn AccountRepository>,
    pub users: Arc<dyn UserRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub timeseries: Arc<dyn TimeSeriesRepository>,
    pub network: Arc<dyn NetworkDataRepository>,
    pub create_account: CreateAccountInteractor,
    pub import_timeseries: ImportTimeSeriesInteractor,
    pub status_service: StatusService,
}

impl QuantaloxContext {
    /// Create a context backed by `<data_dir>/<database_file>`
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let config = Config::load(data_dir)?;
        let db_path = data_dir.join(&config.database_file);
        let database = DuckDbDatabase::open(&db_path)
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;

        Self::build(config, Some(db_path), Arc::new(database))
    }

    /// Create a context on a private in-memory database with default config
    pub fn in_memory() -> Result<Self> {
        let database =
            DuckDbDatabase::open_in_memory().context("Failed to open in-memory database")?;
        Self::build(Config::default(), None, Arc::new(database))
    }

    fn build(config: Config, db_path: Option<PathBuf>, database: Arc<dyn Database>) -> Result<Self> {
        let accounts = SqlAccountRepository::new(Arc::clone(&database));
        let users = SqlUserRepository::new(Arc::clone(&database));
        let settings = SqlSettingsRepository::new(Arc::clone(&database));
        let timeseries = SqlTimeSeriesRepository::new(Arc::clone(&database));

        // Initialize schema
        accounts.initialize_schema()?;
        users.initialize_schema()?;
        settings.initialize_schema()?;
        timeseries.initialize_schema()?;

        let accounts: Arc<dyn AccountRepository> = Arc::new(accounts);
        let users: Arc<dyn UserRepository> = Arc::new(users);
        let settings: Arc<dyn SettingsRepository> = Arc::new(settings);
        let timeseries: Arc<dyn TimeSeriesRepository> = Arc::new(timeseries);

        let mut gateway =
            LsTcDataRepository::new(Box::new(ReqwestHttpClient::new()), &config.lstc_base_url);
        gateway.set_timeouts(config.http_connect_timeout_secs, config.http_read_timeout_secs);
        let network: Arc<dyn NetworkDataRepository> = Arc::new(gateway);

        // Create interactors
        let create_account = CreateAccountInteractor::new(Arc::clone(&accounts));
        let import_timeseries =
            ImportTimeSeriesInteractor::new(Arc::clone(&network), Arc::clone(&timeseries));
        let status_service = StatusService::new(
            Arc::clone(&accounts),
            Arc::clone(&timeseries),
            Arc::clone(&settings),
        );

        Ok(Self {
            config,
            db_path,
            database,
            accounts,
            users,
            settings,
            timeseries,
            network,
            create_account,
            import_timeseries,
            status_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::CreateAccountRequest;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_context_is_usable() {
        let ctx = QuantaloxContext::in_memory().unwrap();
        assert!(ctx.db_path.is_none());

        ctx.create_account
            .execute(CreateAccountRequest {
                id: "a1".into(),
                name: "alice".into(),
                password_hash: None,
                created_at: 1,
            })
            .unwrap();
        ctx.accounts
            .set_property("a1", "risk.level", "high", None)
            .unwrap();

        let status = ctx.status_service.get_status().unwrap();
        assert_eq!(status.total_accounts, 1);
        assert_eq!(status.accounts[0].property_count, 1);
        assert_eq!(ctx.network.name(), "ls-tc");
    }

    #[test]
    fn test_file_context_persists_between_opens() {
        let dir = TempDir::new().unwrap();
        {
            let ctx = QuantaloxContext::new(dir.path()).unwrap();
            assert_eq!(
                ctx.db_path.as_deref(),
                Some(dir.path().join("quantalox.duckdb").as_path())
            );
            ctx.accounts
                .create_account(&Account::new("a1", "alice", 1))
                .unwrap();
        }

        let ctx = QuantaloxContext::new(dir.path()).unwrap();
        assert_eq!(ctx.accounts.count_accounts().unwrap(), 1);
    }
}
