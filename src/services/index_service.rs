use tracing::warn;

use crate::config::IndexSymbol;
use crate::errors::BuildError;
use crate::external::market_data::{ClosePoint, HistoryRange, MarketDataProvider};
use crate::models::{IndexSeries, NormalizedPoint};

/// Build the 1-year base-100 comparison series for the tracked indices.
///
/// Each series is normalized independently against its own first available
/// close, so instruments with very different native magnitudes (an equity
/// index, a gold future, a currency index) land on a shared scale that
/// starts at 100.
pub async fn build_index_series(
    provider: &dyn MarketDataProvider,
    indices: &[IndexSymbol],
    update_time_utc: String,
) -> Result<IndexSeries, BuildError> {
    let symbols: Vec<String> = indices.iter().map(|i| i.symbol.clone()).collect();
    let history = provider
        .fetch_close_history(&symbols, HistoryRange::OneYear)
        .await?;
    if history.is_empty() {
        return Err(BuildError::EmptyDataset);
    }

    let mut series = Vec::with_capacity(indices.len());
    for index in indices {
        let points = history
            .get(&index.symbol)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let normalized = normalize_base_100(points);
        if normalized.is_empty() {
            warn!("No usable closes for index {} ({})", index.name, index.symbol);
        }
        series.push((index.name.clone(), normalized));
    }

    Ok(IndexSeries {
        update_time_utc,
        series,
    })
}

/// Rescale a close series so its first available value becomes 100.
/// Non-finite values are dropped, source order is preserved.
fn normalize_base_100(points: &[ClosePoint]) -> Vec<NormalizedPoint> {
    let Some(base) = points.iter().map(|p| p.close).find(|c| c.is_finite()) else {
        return Vec::new();
    };
    if base == 0.0 {
        return Vec::new();
    }

    points
        .iter()
        .filter_map(|p| {
            let value = p.close / base * 100.0;
            value
                .is_finite()
                .then(|| NormalizedPoint { date: p.date, value })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use crate::external::market_data::{CloseHistory, MarketDataError};

    struct FakeProvider {
        closes: CloseHistory,
    }

    #[async_trait]
    impl MarketDataProvider for FakeProvider {
        async fn fetch_close_history(
            &self,
            _tickers: &[String],
            _range: HistoryRange,
        ) -> Result<CloseHistory, MarketDataError> {
            Ok(self.closes.clone())
        }

        async fn fetch_display_names(
            &self,
            _tickers: &[String],
        ) -> Result<HashMap<String, String>, MarketDataError> {
            Ok(HashMap::new())
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn closes(values: &[f64]) -> Vec<ClosePoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &close)| ClosePoint {
                date: day(i as u32 + 1),
                close,
            })
            .collect()
    }

    fn indices(pairs: &[(&str, &str)]) -> Vec<IndexSymbol> {
        pairs
            .iter()
            .map(|(name, symbol)| IndexSymbol {
                name: name.to_string(),
                symbol: symbol.to_string(),
            })
            .collect()
    }

    fn stamp() -> String {
        "2024-05-03 18:20:11 UTC".to_string()
    }

    #[tokio::test]
    async fn first_emitted_value_is_100() {
        let mut history = CloseHistory::new();
        history.insert("^IXIC".to_string(), closes(&[16000.0, 16800.0, 15200.0]));
        let provider = FakeProvider { closes: history };

        let report = build_index_series(&provider, &indices(&[("nasdaq", "^IXIC")]), stamp())
            .await
            .unwrap();

        let (name, points) = &report.series[0];
        assert_eq!(name, "nasdaq");
        assert!((points[0].value - 100.0).abs() < 1e-9);
        assert!((points[1].value - 105.0).abs() < 1e-9);
        assert!((points[2].value - 95.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn gaps_are_skipped_and_order_preserved() {
        let mut history = CloseHistory::new();
        history.insert(
            "GC=F".to_string(),
            closes(&[f64::NAN, 2000.0, f64::NAN, 2100.0]),
        );
        let provider = FakeProvider { closes: history };

        let report = build_index_series(&provider, &indices(&[("gold", "GC=F")]), stamp())
            .await
            .unwrap();

        let (_, points) = &report.series[0];
        assert_eq!(points.len(), 2);
        assert!((points[0].value - 100.0).abs() < 1e-9);
        assert_eq!(points[0].date, day(2));
        assert!((points[1].value - 105.0).abs() < 1e-9);
        assert_eq!(points[1].date, day(4));
    }

    #[tokio::test]
    async fn missing_index_yields_empty_series() {
        let mut history = CloseHistory::new();
        history.insert("^IXIC".to_string(), closes(&[16000.0, 16100.0]));
        let provider = FakeProvider { closes: history };

        let universe = indices(&[("nasdaq", "^IXIC"), ("dollar", "DX-Y.NYB")]);
        let report = build_index_series(&provider, &universe, stamp()).await.unwrap();

        assert_eq!(report.series.len(), 2);
        assert_eq!(report.series[1].0, "dollar");
        assert!(report.series[1].1.is_empty());
    }

    #[tokio::test]
    async fn series_follow_configuration_order() {
        let mut history = CloseHistory::new();
        history.insert("^IXIC".to_string(), closes(&[1.0, 2.0]));
        history.insert("^DJI".to_string(), closes(&[3.0, 4.0]));
        let provider = FakeProvider { closes: history };

        let universe = indices(&[("dowjones", "^DJI"), ("nasdaq", "^IXIC")]);
        let report = build_index_series(&provider, &universe, stamp()).await.unwrap();

        let names: Vec<&str> = report.series.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["dowjones", "nasdaq"]);
    }

    #[tokio::test]
    async fn empty_batch_is_fatal() {
        let provider = FakeProvider {
            closes: CloseHistory::new(),
        };

        let result =
            build_index_series(&provider, &indices(&[("nasdaq", "^IXIC")]), stamp()).await;
        assert!(matches!(result, Err(BuildError::EmptyDataset)));
    }

    #[test]
    fn zero_base_produces_no_points() {
        let points = closes(&[0.0, 10.0, 20.0]);
        assert!(normalize_base_100(&points).is_empty());
    }
}
