//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Use cases depend
//! only on these traits, not on concrete implementations.

mod account_repository;
pub mod database;
pub mod http;
mod network_data;
mod settings_repository;
mod timeseries_repository;
mod user_repository;

pub use account_repository::AccountRepository;
pub use database::{Database, DbResult, DbRow, DbValue, Statement};
pub use http::{HttpClient, HttpResponse, NetworkError};
pub use network_data::NetworkDataRepository;
pub use settings_repository::SettingsRepository;
pub use timeseries_repository::TimeSeriesRepository;
pub use user_repository::UserRepository;
