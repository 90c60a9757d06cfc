//! Property commands - key/value attributes of an account

use anyhow::{anyhow, Result};
use clap::Subcommand;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum PropertyCommands {
    /// Create or overwrite a property
    Set {
        account_id: String,
        key: String,
        value: String,
        /// Free-text description
        #[arg(long)]
        description: Option<String>,
    },

    /// Print one property value
    Get {
        account_id: String,
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List properties of an account
    List {
        account_id: String,
        /// Only keys starting with this prefix (e.g. "portfolio.")
        #[arg(long)]
        prefix: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a property, or every property under --prefix
    Remove {
        account_id: String,
        key: Option<String>,
        /// Remove all keys starting with this prefix
        #[arg(long, conflicts_with = "key")]
        prefix: Option<String>,
    },
}

pub fn run(command: PropertyCommands) -> Result<()> {
    match command {
        PropertyCommands::Set {
            account_id,
            key,
            value,
            description,
        } => run_set(&account_id, &key, &value, description.as_deref()),
        PropertyCommands::Get {
            account_id,
            key,
            json,
        } => run_get(&account_id, &key, json),
        PropertyCommands::List {
            account_id,
            prefix,
            json,
        } => run_list(&account_id, prefix.as_deref(), json),
        PropertyCommands::Remove {
            account_id,
            key,
            prefix,
        } => run_remove(&account_id, key.as_deref(), prefix.as_deref()),
    }
}

fn run_set(account_id: &str, key: &str, value: &str, description: Option<&str>) -> Result<()> {
    let ctx = get_context()?;
    ctx.accounts
        .set_property(account_id, key, value, description)?;
    output::success(&format!("Set {} on account '{}'", key, account_id));
    Ok(())
}

fn run_get(account_id: &str, key: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let property = ctx
        .accounts
        .get_property(account_id, key)?
        .ok_or_else(|| anyhow!("Property '{}' not set on account '{}'", key, account_id))?;

    if json {
        output::print_json(&property)?;
    } else {
        println!("{}", property.value);
    }
    Ok(())
}

fn run_list(account_id: &str, prefix: Option<&str>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let properties = match prefix {
        Some(prefix) => ctx.accounts.get_properties_by_prefix(account_id, prefix)?,
        None => ctx.accounts.get_properties(account_id)?,
    };

    if json {
        return output::print_json(&properties);
    }

    if properties.is_empty() {
        output::info("No properties found");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Key", "Value", "Description"]);
    for property in &properties {
        table.add_row(vec![
            property.key.clone(),
            property.value.clone(),
            property.description.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn run_remove(account_id: &str, key: Option<&str>, prefix: Option<&str>) -> Result<()> {
    let ctx = get_context()?;
    let removed = match (key, prefix) {
        (Some(key), _) => ctx.accounts.remove_property(account_id, key)?,
        (None, Some(prefix)) => ctx
            .accounts
            .remove_properties_by_prefix(account_id, prefix)?,
        (None, None) => return Err(anyhow!("Give a key or --prefix")),
    };

    if removed == 0 {
        output::warning("Nothing removed");
    } else {
        let noun = if removed == 1 { "property" } else { "properties" };
        output::success(&format!("Removed {} {}", removed, noun));
    }
    Ok(())
}
