use thiserror::Error;

use crate::external::market_data::MarketDataError;

/// Why a snapshot build was abandoned. Per-ticker gaps never land here;
/// builders recover from those locally by skipping the ticker.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("the batched price fetch returned no usable data")]
    EmptyDataset,

    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}
