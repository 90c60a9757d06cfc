//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the Database port
//! - SQL repositories on top of any Database
//! - reqwest for the HttpClient port
//! - ls-tc.de chart gateway for NetworkDataRepository

pub mod duckdb;
pub mod http_client;
pub mod lstc;
pub mod sql_account;
pub mod sql_settings;
pub mod sql_timeseries;
pub mod sql_user;

pub use self::duckdb::DuckDbDatabase;
pub use http_client::{build_query_string, split_url, ParsedUrl, ReqwestHttpClient};
pub use lstc::{LsTcDataRepository, LSTC_DEFAULT_BASE_URL, LSTC_SOURCE};
pub use sql_account::SqlAccountRepository;
pub use sql_settings::SqlSettingsRepository;
pub use sql_timeseries::SqlTimeSeriesRepository;
pub use sql_user::SqlUserRepository;
