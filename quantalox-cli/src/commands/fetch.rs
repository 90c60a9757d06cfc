//! Fetch command - pull intraday prices from ls-tc.de

use anyhow::{Context, Result};
use colored::Colorize;
use quantalox_core::services::ImportTimeSeriesRequest;

use super::get_context;
use crate::output;

/// Rows shown in table mode; JSON always carries every point
const PREVIEW_ROWS: usize = 10;

pub fn run(instrument_id: &str, store: bool, name: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    if store {
        let response = ctx
            .import_timeseries
            .execute(ImportTimeSeriesRequest {
                instrument_id: instrument_id.to_string(),
                asset_name: name,
            })
            .with_context(|| format!("Failed to import instrument {}", instrument_id))?;

        if json {
            return output::print_json(&response);
        }
        output::success(&format!(
            "Stored {} points for {}",
            response.fetched, response.asset_id
        ));
        if let Some(latest) = response.latest_timestamp_ms {
            println!("  Latest: {}", output::format_timestamp_ms(latest));
        }
        return Ok(());
    }

    let points = ctx
        .network
        .fetch_time_series_data(instrument_id)
        .with_context(|| format!("Failed to fetch instrument {}", instrument_id))?;

    if json {
        return output::print_json(&points);
    }

    println!(
        "{} {} ({} points from {})",
        "Instrument".bold(),
        instrument_id,
        points.len(),
        ctx.network.name()
    );
    if points.is_empty() {
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Price"]);
    for point in points.iter().rev().take(PREVIEW_ROWS) {
        table.add_row(vec![
            output::format_timestamp_ms(point.timestamp_ms),
            format!("{:.4}", point.value),
        ]);
    }
    println!("{}", table);
    if points.len() > PREVIEW_ROWS {
        output::info(&format!(
            "Showing the last {} points; use --json for all of them",
            PREVIEW_ROWS
        ));
    }

    Ok(())
}
