//! Quantalox CLI - portfolio data in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;
mod tracing_setup;

use commands::{account, config, fetch, property, status};

/// Quantalox - portfolio data in your terminal
#[derive(Parser)]
#[command(name = "qx", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show account and asset summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage accounts
    Account {
        #[command(subcommand)]
        command: account::AccountCommands,
    },

    /// Manage account properties
    Property {
        #[command(subcommand)]
        command: property::PropertyCommands,
    },

    /// Show or edit settings.json
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// Fetch intraday prices for an instrument from ls-tc.de
    Fetch {
        /// Instrument ID (e.g. 43763)
        instrument_id: String,
        /// Store the fetched points in the local database
        #[arg(long)]
        store: bool,
        /// Name for the asset when it is created by --store
        #[arg(long, requires = "store")]
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = tracing_setup::init_tracing(cli.debug) {
        output::warning(&format!("Logging disabled: {}", e));
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::Account { command } => account::run(command),
        Commands::Property { command } => property::run(command),
        Commands::Config { command } => config::run(command),
        Commands::Fetch {
            instrument_id,
            store,
            name,
            json,
        } => fetch::run(&instrument_id, store, name, json),
    }
}
