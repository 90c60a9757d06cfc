//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set. Otherwise only warnings are shown, or
//! everything down to `debug` with `--debug`. Logs go to stderr so JSON
//! output on stdout stays clean.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub fn init_tracing(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
