use chrono::Utc;

/// `generated_at` label shared by all reports of one run,
/// e.g. `2024-05-03 18:20:11 UTC`.
pub fn now_utc_label() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_has_expected_shape() {
        let label = now_utc_label();
        assert!(label.ends_with(" UTC"));
        assert_eq!(label.len(), "2024-05-03 18:20:11 UTC".len());
    }
}
