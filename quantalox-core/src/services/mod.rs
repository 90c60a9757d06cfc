//! Service layer - use case orchestration
//!
//! Interactors coordinate domain logic and port interactions. Each one
//! focuses on a single use case and depends only on port traits.

mod create_account;
mod import_timeseries;
mod status;

pub use create_account::{
    CreateAccountError, CreateAccountInteractor, CreateAccountRequest, CreateAccountResponse,
};
pub use import_timeseries::{
    ImportTimeSeriesInteractor, ImportTimeSeriesRequest, ImportTimeSeriesResponse,
};
pub use status::{AccountSummary, AssetSummary, StatusService, StatusSummary};
