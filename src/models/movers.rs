use serde::{Deserialize, Serialize};

/// One ranked ticker in a movers snapshot. The serialized field names are
/// the downstream display contract and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoverRecord {
    #[serde(rename = "代码")]
    pub code: String,

    #[serde(rename = "名称")]
    pub name: String,

    #[serde(rename = "Percent")]
    pub percent_change: f64,
}

/// Gainers/losers snapshot for one index universe, rebuilt from scratch
/// on every run and written as a whole file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoversReport {
    pub update_time_utc: String,
    pub top_up_20: Vec<MoverRecord>,
    pub top_down_20: Vec<MoverRecord>,
}
