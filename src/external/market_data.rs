use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// One trading-day close as delivered by the provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// History window for a batched close fetch, daily granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRange {
    /// The two most recent trading days.
    TwoDays,
    /// One calendar year.
    OneYear,
}

/// Batched close history per ticker, chronological ascending. Tickers the
/// provider knows nothing about are absent from the map; callers treat
/// that as a data gap, not an error.
pub type CloseHistory = HashMap<String, Vec<ClosePoint>>;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch daily closes for all `tickers` in one batched call.
    async fn fetch_close_history(
        &self,
        tickers: &[String],
        range: HistoryRange,
    ) -> Result<CloseHistory, MarketDataError>;

    /// Resolve human-readable display names for `tickers` in one batched
    /// call. Missing tickers are simply absent from the result.
    async fn fetch_display_names(
        &self,
        tickers: &[String],
    ) -> Result<HashMap<String, String>, MarketDataError>;
}
