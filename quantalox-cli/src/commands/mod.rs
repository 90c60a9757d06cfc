//! CLI command implementations

pub mod account;
pub mod config;
pub mod fetch;
pub mod property;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use quantalox_core::QuantaloxContext;
use tracing::debug;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "QX_DIR";

/// Get the quantalox directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory (set QX_DIR)")?;
    Ok(home.join(".quantalox"))
}

/// Open the context for the current data directory
pub fn get_context() -> Result<QuantaloxContext> {
    let data_dir = get_data_dir()?;
    debug!(data_dir = %data_dir.display(), "opening context");
    QuantaloxContext::new(&data_dir).context("Failed to initialize quantalox context")
}
