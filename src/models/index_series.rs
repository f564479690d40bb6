use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One day of a base-100 normalized index series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Normalized 1-year history for every tracked index, keyed by display
/// name. Serializes flat: `update_time_utc` first, then one key per index
/// in configuration order, so the JSON shape matches what the display
/// layer consumes.
#[derive(Debug, Clone)]
pub struct IndexSeries {
    pub update_time_utc: String,
    pub series: Vec<(String, Vec<NormalizedPoint>)>,
}

impl Serialize for IndexSeries {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.series.len() + 1))?;
        map.serialize_entry("update_time_utc", &self.update_time_utc)?;
        for (name, points) in &self.series {
            map.serialize_entry(name, points)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_flat_in_configuration_order() {
        let series = IndexSeries {
            update_time_utc: "2024-05-03 18:20:11 UTC".to_string(),
            series: vec![
                (
                    "nasdaq".to_string(),
                    vec![NormalizedPoint {
                        date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                        value: 100.0,
                    }],
                ),
                ("gold".to_string(), vec![]),
            ],
        };

        let json = serde_json::to_string(&series).unwrap();
        assert!(json.starts_with(r#"{"update_time_utc""#));
        assert!(json.contains(r#""nasdaq":[{"date":"2024-01-02","value":100.0}]"#));

        let nasdaq_at = json.find("\"nasdaq\"").unwrap();
        let gold_at = json.find("\"gold\"").unwrap();
        assert!(nasdaq_at < gold_at);
    }
}
