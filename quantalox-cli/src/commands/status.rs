//! Status command - show account and asset summary

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        return output::print_json(&status);
    }

    println!("{}", "Quantalox Status".bold());
    if let Some(path) = &ctx.db_path {
        println!("Database: {}", path.display());
    }
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Accounts", &status.total_accounts.to_string()]);
    table.add_row(vec!["Assets", &status.total_assets.to_string()]);
    table.add_row(vec!["Units", &status.total_units.to_string()]);
    table.add_row(vec!["Settings", &status.total_settings.to_string()]);
    println!("{}", table);

    if !status.accounts.is_empty() {
        println!();
        println!("{}", "Accounts".bold());
        let mut accounts = output::create_table();
        accounts.set_header(vec!["ID", "Name", "Properties"]);
        for account in &status.accounts {
            accounts.add_row(vec![
                account.id.clone(),
                account.name.clone(),
                account.property_count.to_string(),
            ]);
        }
        println!("{}", accounts);
    }

    if !status.assets.is_empty() {
        println!();
        println!("{}", "Assets".bold());
        let mut assets = output::create_table();
        assets.set_header(vec!["ID", "Name", "Source", "Latest"]);
        for asset in &status.assets {
            assets.add_row(vec![
                asset.id.clone(),
                asset.name.clone(),
                asset.source.clone(),
                asset
                    .latest_timestamp_ms
                    .map(output::format_timestamp_ms)
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }
        println!("{}", assets);
    }

    Ok(())
}
