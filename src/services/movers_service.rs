use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::errors::BuildError;
use crate::external::market_data::{ClosePoint, HistoryRange, MarketDataProvider};
use crate::models::{MoverRecord, MoversReport};

/// Entries kept on each side of the ranking.
const TOP_N: usize = 20;

/// Build a gainers/losers snapshot for `tickers` from the two most recent
/// trading-day closes.
///
/// Tickers with a missing, non-finite or zero previous close are skipped.
/// Only a batch with no usable ticker at all aborts the build; the caller
/// then skips the file write and keeps the previous snapshot.
pub async fn build_movers_report(
    provider: &dyn MarketDataProvider,
    tickers: &[String],
    update_time_utc: String,
) -> Result<MoversReport, BuildError> {
    let history = provider
        .fetch_close_history(tickers, HistoryRange::TwoDays)
        .await?;
    if history.is_empty() {
        return Err(BuildError::EmptyDataset);
    }

    // Name lookup is best effort: a failed call degrades every ticker to
    // its symbol, a partial answer degrades only the missing ones.
    let names = match provider.fetch_display_names(tickers).await {
        Ok(names) => names,
        Err(e) => {
            warn!("Display name lookup failed, falling back to symbols: {}", e);
            HashMap::new()
        }
    };

    let mut records: Vec<MoverRecord> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for ticker in tickers {
        if !seen.insert(ticker.as_str()) {
            continue;
        }
        let Some(percent_change) = latest_percent_change(history.get(ticker)) else {
            warn!("Skipping {}: no usable close pair", ticker);
            continue;
        };
        records.push(MoverRecord {
            code: ticker.clone(),
            name: names.get(ticker).cloned().unwrap_or_else(|| ticker.clone()),
            percent_change,
        });
    }

    if records.is_empty() {
        return Err(BuildError::EmptyDataset);
    }

    // Stable sorts keep input-list order among equal changes.
    records.sort_by(|a, b| {
        b.percent_change
            .partial_cmp(&a.percent_change)
            .unwrap_or(Ordering::Equal)
    });
    let top_up_20 = records.iter().take(TOP_N).cloned().collect();

    records.sort_by(|a, b| {
        a.percent_change
            .partial_cmp(&b.percent_change)
            .unwrap_or(Ordering::Equal)
    });
    let top_down_20 = records.iter().take(TOP_N).cloned().collect();

    Ok(MoversReport {
        update_time_utc,
        top_up_20,
        top_down_20,
    })
}

/// Percent change between the last two closes, or `None` when the pair is
/// unusable: fewer than two points, non-finite closes, or a zero base.
fn latest_percent_change(points: Option<&Vec<ClosePoint>>) -> Option<f64> {
    let points = points?;
    if points.len() < 2 {
        return None;
    }

    let previous = points[points.len() - 2].close;
    let latest = points[points.len() - 1].close;
    if !previous.is_finite() || !latest.is_finite() || previous == 0.0 {
        return None;
    }

    Some((latest - previous) / previous * 100.0)
}
