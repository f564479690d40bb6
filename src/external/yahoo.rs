use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::external::market_data::{
    CloseHistory, ClosePoint, HistoryRange, MarketDataError, MarketDataProvider,
};

/// Yahoo Finance provider. Free JSON endpoints, no API key; close history
/// and display names are both fetched through batched symbol-list calls.
pub struct YahooProvider {
    client: reqwest::Client,
}

// Yahoo accepts long symbol lists, but keep URLs bounded.
const SYMBOLS_PER_REQUEST: usize = 50;

impl YahooProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; UsTracker/0.1)")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    async fn spark_chunk(
        &self,
        symbols: &[String],
        range: &str,
    ) -> Result<CloseHistory, MarketDataError> {
        let url = "https://query1.finance.yahoo.com/v8/finance/spark";

        let resp = self
            .client
            .get(url)
            .query(&[
                ("symbols", symbols.join(",").as_str()),
                ("range", range),
                ("interval", "1d"),
            ])
            .send()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited);
        }
        if !resp.status().is_success() {
            return Err(MarketDataError::BadResponse(format!("HTTP {}", resp.status())));
        }

        let body: SparkResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        if let Some(error) = body.spark.error {
            return Err(MarketDataError::BadResponse(error.to_string()));
        }

        Ok(collect_spark(body.spark.result.unwrap_or_default()))
    }

    async fn quote_chunk(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, String>, MarketDataError> {
        let url = "https://query1.finance.yahoo.com/v7/finance/quote";

        let resp = self
            .client
            .get(url)
            .query(&[("symbols", symbols.join(",").as_str())])
            .send()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited);
        }
        if !resp.status().is_success() {
            return Err(MarketDataError::BadResponse(format!("HTTP {}", resp.status())));
        }

        let body: QuoteResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        if let Some(error) = body.quote_response.error {
            return Err(MarketDataError::BadResponse(error.to_string()));
        }

        let names = body
            .quote_response
            .result
            .unwrap_or_default()
            .into_iter()
            .filter_map(|q| {
                let name = q.long_name.or(q.short_name)?;
                Some((q.symbol, name))
            })
            .collect();

        Ok(names)
    }
}

// Minimal response structs (only what we need)

#[derive(Debug, Deserialize)]
struct SparkResponse {
    spark: SparkBody,
}

#[derive(Debug, Deserialize)]
struct SparkBody {
    result: Option<Vec<SparkResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SparkResult {
    symbol: String,
    response: Option<Vec<SparkChart>>,
}

#[derive(Debug, Deserialize)]
struct SparkChart {
    timestamp: Option<Vec<i64>>,
    indicators: SparkIndicators,
}

#[derive(Debug, Deserialize)]
struct SparkIndicators {
    quote: Vec<SparkQuote>,
}

#[derive(Debug, Deserialize)]
struct SparkQuote {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteBody,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    result: Option<Vec<QuoteResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    symbol: String,
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
}

/// Flatten a spark payload into per-symbol close series. Null closes
/// (holidays, halts) are skipped; timestamps align with closes by index.
fn collect_spark(results: Vec<SparkResult>) -> CloseHistory {
    let mut history = CloseHistory::new();

    for result in results {
        let Some(chart) = result.response.unwrap_or_default().into_iter().next() else {
            continue;
        };

        let timestamps = chart.timestamp.unwrap_or_default();
        let closes = chart
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .unwrap_or_default();

        let mut points: Vec<ClosePoint> = timestamps
            .iter()
            .zip(closes)
            .filter_map(|(ts, close)| {
                let close = close?;
                let date = chrono::DateTime::from_timestamp(*ts, 0)?.date_naive();
                Some(ClosePoint { date, close })
            })
            .collect();

        // Ensure ascending by date
        points.sort_by_key(|p| p.date);

        if !points.is_empty() {
            history.insert(result.symbol, points);
        }
    }

    history
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_close_history(
        &self,
        tickers: &[String],
        range: HistoryRange,
    ) -> Result<CloseHistory, MarketDataError> {
        let range = match range {
            HistoryRange::TwoDays => "2d",
            HistoryRange::OneYear => "1y",
        };

        let chunks = tickers
            .chunks(SYMBOLS_PER_REQUEST)
            .map(|chunk| self.spark_chunk(chunk, range));

        let mut history = CloseHistory::new();
        for chunk in futures::future::try_join_all(chunks).await? {
            history.extend(chunk);
        }

        debug!(
            "Fetched {} close history for {} of {} symbols",
            range,
            history.len(),
            tickers.len()
        );
        Ok(history)
    }

    async fn fetch_display_names(
        &self,
        tickers: &[String],
    ) -> Result<HashMap<String, String>, MarketDataError> {
        let chunks = tickers
            .chunks(SYMBOLS_PER_REQUEST)
            .map(|chunk| self.quote_chunk(chunk));

        let mut names = HashMap::new();
        for chunk in futures::future::try_join_all(chunks).await? {
            names.extend(chunk);
        }

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_spark_payload_and_skips_null_closes() {
        let payload = serde_json::json!({
            "spark": {
                "result": [
                    {
                        "symbol": "AAPL",
                        "response": [{
                            "timestamp": [1714608000, 1714694400, 1714953600],
                            "indicators": { "quote": [{ "close": [182.4, null, 186.1] }] }
                        }]
                    },
                    { "symbol": "EMPTY", "response": [] }
                ],
                "error": null
            }
        });

        let body: SparkResponse = serde_json::from_value(payload).unwrap();
        let history = collect_spark(body.spark.result.unwrap());

        let aapl = &history["AAPL"];
        assert_eq!(aapl.len(), 2);
        assert!(aapl[0].date < aapl[1].date);
        assert_eq!(aapl[1].close, 186.1);
        assert!(!history.contains_key("EMPTY"));
    }
}
