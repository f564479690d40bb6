use std::path::Path;

use serde::Serialize;
use tracing::{error, info};

use crate::config::TrackerConfig;
use crate::errors::BuildError;
use crate::external::market_data::MarketDataProvider;
use crate::services::{index_service, movers_service};
use crate::utils::now_utc_label;

/// Run the full refresh: both movers snapshots plus the index series.
///
/// Each output file is built and written independently. An abandoned
/// build leaves the previous file in place and the run carries on, so one
/// bad dataset never blocks the other files.
pub async fn run(
    config: &TrackerConfig,
    provider: &dyn MarketDataProvider,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.output_dir)?;

    refresh_movers(provider, &config.nasdaq_tickers, &config.nas_output_path()).await;
    refresh_movers(provider, &config.dow_tickers, &config.dow_output_path()).await;
    refresh_indices(provider, config).await;

    info!("Data refresh finished");
    Ok(())
}

async fn refresh_movers(provider: &dyn MarketDataProvider, tickers: &[String], path: &Path) {
    info!("Fetching data for {} tickers for {}", tickers.len(), path.display());

    match movers_service::build_movers_report(provider, tickers, now_utc_label()).await {
        Ok(report) => write_report(path, &report),
        Err(e) => log_abandoned(path, &e),
    }
}

async fn refresh_indices(provider: &dyn MarketDataProvider, config: &TrackerConfig) {
    let path = config.index_output_path();
    info!("Fetching 1-year index data for {}", path.display());

    match index_service::build_index_series(provider, &config.index_tickers, now_utc_label()).await
    {
        Ok(series) => write_report(&path, &series),
        Err(e) => log_abandoned(&path, &e),
    }
}

// Whole-file overwrite, no locking: the snapshot is best effort and a
// concurrent reader may observe the previous file.
fn write_report<T: Serialize>(path: &Path, report: &T) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => match std::fs::write(path, json) {
            Ok(()) => info!("Saved {}", path.display()),
            Err(e) => error!("Could not write {}: {}", path.display(), e),
        },
        Err(e) => error!("Could not serialize report for {}: {}", path.display(), e),
    }
}

fn log_abandoned(path: &Path, err: &BuildError) {
    match err {
        BuildError::EmptyDataset => error!(
            "Could not download data for {}; keeping the previous file",
            path.display()
        ),
        other => error!("Build for {} aborted: {}", path.display(), other),
    }
}
