//! Status service - account and storage summaries

use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::Result;
use crate::ports::{AccountRepository, SettingsRepository, TimeSeriesRepository};

/// Status service for account and time-series summaries
pub struct StatusService {
    accounts: Arc<dyn AccountRepository>,
    timeseries: Arc<dyn TimeSeriesRepository>,
    settings: Arc<dyn SettingsRepository>,
}

impl StatusService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        timeseries: Arc<dyn TimeSeriesRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            accounts,
            timeseries,
            settings,
        }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> Result<StatusSummary> {
        let accounts = self.accounts.get_all_accounts()?;
        let assets = self.timeseries.get_all_assets()?;

        let mut account_summaries = Vec::with_capacity(accounts.len());
        for account in accounts {
            let property_count = self.accounts.count_properties(&account.id)?;
            account_summaries.push(AccountSummary {
                id: account.id,
                name: account.name,
                property_count,
            });
        }

        let mut asset_summaries = Vec::with_capacity(assets.len());
        for asset in assets {
            let latest_timestamp_ms = self
                .timeseries
                .get_latest_point(&asset.id)?
                .map(|p| p.timestamp_ms);
            asset_summaries.push(AssetSummary {
                id: asset.id,
                name: asset.name,
                source: asset.source,
                latest_timestamp_ms,
            });
        }

        Ok(StatusSummary {
            total_accounts: account_summaries.len() as i64,
            total_assets: asset_summaries.len() as i64,
            total_units: self.timeseries.get_all_units()?.len() as i64,
            total_settings: self.settings.count()?,
            accounts: account_summaries,
            assets: asset_summaries,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_accounts: i64,
    pub total_assets: i64,
    pub total_units: i64,
    pub total_settings: i64,
    pub accounts: Vec<AccountSummary>,
    pub assets: Vec<AssetSummary>,
}

#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    pub property_count: i64,
}

#[derive(Debug, Serialize)]
pub struct AssetSummary {
    pub id: String,
    pub name: String,
    pub source: String,
    pub latest_timestamp_ms: Option<i64>,
}
