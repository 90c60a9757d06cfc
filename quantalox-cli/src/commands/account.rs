//! Account commands - create, inspect and delete accounts

use anyhow::{anyhow, bail, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use chrono::Utc;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Password};
use quantalox_core::services::CreateAccountRequest;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Unique account name
        name: String,
        /// Account ID (a random UUID if omitted)
        #[arg(long)]
        id: Option<String>,
        /// Password (prompted for if omitted)
        #[arg(long, env = "QX_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Create the account without a password
        #[arg(long, conflicts_with = "password")]
        no_password: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one account
    Get {
        /// Account ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all accounts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an account and its properties
    Delete {
        /// Account ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub fn run(command: AccountCommands) -> Result<()> {
    match command {
        AccountCommands::Create {
            name,
            id,
            password,
            no_password,
            json,
        } => run_create(name, id, password, no_password, json),
        AccountCommands::Get { id, json } => run_get(&id, json),
        AccountCommands::List { json } => run_list(json),
        AccountCommands::Delete { id, force } => run_delete(&id, force),
    }
}

/// Hash a password into an Argon2id PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

fn prompt_password() -> Result<String> {
    let password = Password::new()
        .with_prompt("Account password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;
    Ok(password)
}

fn run_create(
    name: String,
    id: Option<String>,
    password: Option<String>,
    no_password: bool,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;

    let password = match (password, no_password) {
        (_, true) => None,
        (Some(p), false) => Some(p),
        (None, false) => Some(prompt_password()?),
    };
    let password_hash = match password {
        Some(p) if p.is_empty() => bail!("Password cannot be empty (use --no-password)"),
        Some(p) => Some(hash_password(&p)?.into_bytes()),
        None => None,
    };

    let response = ctx.create_account.execute(CreateAccountRequest {
        id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        name,
        password_hash,
        created_at: Utc::now().timestamp_millis(),
    })?;

    if json {
        output::print_json(&response)?;
    } else {
        output::success("Account created");
        println!("  ID: {}", response.id);
        println!("  Name: {}", response.name);
        println!(
            "  Created: {}",
            output::format_timestamp_ms(response.created_at)
        );
    }

    Ok(())
}

fn run_get(id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let account = ctx
        .accounts
        .get_account(id)?
        .ok_or_else(|| anyhow!("Account not found: {}", id))?;

    if json {
        return output::print_json(&account);
    }

    let property_count = ctx.accounts.count_properties(id)?;
    println!("{}", account.name.bold());
    println!("  ID: {}", account.id);
    println!(
        "  Created: {}",
        output::format_timestamp_ms(account.created_at)
    );
    println!(
        "  Password: {}",
        if account.password_hash.is_some() { "set" } else { "none" }
    );
    println!("  Properties: {}", property_count);

    Ok(())
}

fn run_list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let accounts = ctx.accounts.get_all_accounts()?;

    if json {
        return output::print_json(&accounts);
    }

    if accounts.is_empty() {
        output::info("No accounts yet. Create one with 'qx account create <name>'");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Created"]);
    for account in &accounts {
        table.add_row(vec![
            account.id.clone(),
            account.name.clone(),
            output::format_timestamp_ms(account.created_at),
        ]);
    }
    println!("{}", table);

    Ok(())
}

fn run_delete(id: &str, force: bool) -> Result<()> {
    let ctx = get_context()?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete account '{}' and all its properties?", id))
            .default(false)
            .interact()?;
        if !confirmed {
            output::info("Cancelled");
            return Ok(());
        }
    }

    if ctx.accounts.delete_account(id)? {
        output::success(&format!("Account '{}' deleted", id));
    } else {
        output::warning(&format!("Account '{}' not found", id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    #[test]
    fn test_hash_password_is_verifiable_phc_string() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default()
            .verify_password(b"hunter2", &parsed)
            .is_ok());
        assert!(Argon2::default()
            .verify_password(b"wrong", &parsed)
            .is_err());
    }

    #[test]
    fn test_hash_password_uses_fresh_salt() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }
}
