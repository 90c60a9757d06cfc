//! Config commands - inspect and edit settings.json

use anyhow::Result;
use clap::Subcommand;
use quantalox_core::config::{Config, CONFIG_KEYS, SETTINGS_FILE};
use serde_json::{Map, Value};

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration (settings.json plus QX_* overrides)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write one key to settings.json
    Set {
        /// One of: databaseFile, http.connectTimeoutSecs, http.readTimeoutSecs, lstc.baseUrl
        key: String,
        value: String,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show { json } => run_show(json),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
    }
}

fn run_show(json: bool) -> Result<()> {
    let config = Config::load(&get_data_dir()?)?;

    if json {
        let map: Map<String, Value> = CONFIG_KEYS
            .iter()
            .filter_map(|key| config.get(key).map(|v| (key.to_string(), Value::String(v))))
            .collect();
        return output::print_json(&map);
    }

    let mut table = output::create_table();
    table.set_header(vec!["Key", "Value"]);
    for key in CONFIG_KEYS {
        table.add_row(vec![key.to_string(), config.get(key).unwrap_or_default()]);
    }
    println!("{}", table);
    Ok(())
}

fn run_set(key: &str, value: &str) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let mut config = Config::load_file(&data_dir)?;
    config.set(key, value)?;
    config.save(&data_dir)?;

    output::success(&format!(
        "Set {} = {} in {}",
        key,
        config.get(key).unwrap_or_default(),
        data_dir.join(SETTINGS_FILE).display()
    ));
    Ok(())
}
