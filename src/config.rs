use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

// Nasdaq-100 constituents (sample list; update from a reliable source as
// the index composition changes).
const NASDAQ_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "AMZN", "NVDA", "GOOGL", "GOOG", "TSLA", "META", "AVGO", "PEP",
    "COST", "ADBE", "CSCO", "TMUS", "NFLX", "AMD", "INTC", "CMCSA", "QCOM", "INTU",
];

// Dow Jones 30 constituents.
const DOW_TICKERS: &[&str] = &[
    "AXP", "AMGN", "AAPL", "BA", "CAT", "CSCO", "CVX", "GS", "HD", "HON",
    "IBM", "INTC", "JNJ", "KO", "JPM", "MCD", "MMM", "MRK", "MSFT", "NKE",
    "PG", "TRV", "UNH", "CRM", "VZ", "V", "WBA", "WMT", "DIS", "DOW",
];

// Tracked indices in output order. "gold" is the COMEX gold future,
// "dollar" the US dollar index.
const INDEX_TICKERS: &[(&str, &str)] = &[
    ("nasdaq", "^IXIC"),
    ("dowjones", "^DJI"),
    ("gold", "GC=F"),
    ("dollar", "DX-Y.NYB"),
];

/// One tracked index: the display name used as a JSON key and the
/// provider symbol it is fetched under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexSymbol {
    pub name: String,
    pub symbol: String,
}

/// Tracked-universe configuration: which tickers feed each snapshot and
/// where the output files land. Static data rather than logic; the
/// compiled-in defaults can be replaced wholesale by a JSON file pointed
/// at by `TRACKER_CONFIG`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub nasdaq_tickers: Vec<String>,
    pub dow_tickers: Vec<String>,
    pub index_tickers: Vec<IndexSymbol>,
    pub output_dir: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            nasdaq_tickers: NASDAQ_TICKERS.iter().map(|t| t.to_string()).collect(),
            dow_tickers: DOW_TICKERS.iter().map(|t| t.to_string()).collect(),
            index_tickers: INDEX_TICKERS
                .iter()
                .map(|(name, symbol)| IndexSymbol {
                    name: name.to_string(),
                    symbol: symbol.to_string(),
                })
                .collect(),
            output_dir: PathBuf::from("data"),
        }
    }
}

impl TrackerConfig {
    /// Load the tracked universe, preferring a `TRACKER_CONFIG` JSON file
    /// over the compiled-in defaults. `OUTPUT_DIR` overrides the output
    /// directory either way.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var("TRACKER_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading tracker config at {}", path))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing tracker config at {}", path))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(dir) = std::env::var("OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    pub fn nas_output_path(&self) -> PathBuf {
        self.output_dir.join("us_nas_stock_data.json")
    }

    pub fn dow_output_path(&self) -> PathBuf {
        self.output_dir.join("us_dowj_stock_data.json")
    }

    pub fn index_output_path(&self) -> PathBuf {
        self.output_dir.join("us_index_data.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universe_is_populated() {
        let config = TrackerConfig::default();
        assert!(!config.nasdaq_tickers.is_empty());
        assert_eq!(config.dow_tickers.len(), 30);

        let names: Vec<&str> = config.index_tickers.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["nasdaq", "dowjones", "gold", "dollar"]);
    }

    #[test]
    fn output_paths_live_under_output_dir() {
        let config = TrackerConfig::default();
        assert_eq!(config.nas_output_path(), PathBuf::from("data/us_nas_stock_data.json"));
        assert_eq!(config.dow_output_path(), PathBuf::from("data/us_dowj_stock_data.json"));
        assert_eq!(config.index_output_path(), PathBuf::from("data/us_index_data.json"));
    }

    #[test]
    fn config_file_shape_deserializes() {
        let raw = r#"{
            "nasdaq_tickers": ["AAPL"],
            "dow_tickers": ["BA"],
            "index_tickers": [{"name": "nasdaq", "symbol": "^IXIC"}],
            "output_dir": "out"
        }"#;
        let config: TrackerConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.nasdaq_tickers, ["AAPL"]);
        assert_eq!(config.index_tickers[0].symbol, "^IXIC");
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }
}
