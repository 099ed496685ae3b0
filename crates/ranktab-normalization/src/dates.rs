//! Date-like column detection.

/// Case-insensitive fragments that mark a column as holding dates.
const DATE_MARKERS: &[&str] = &["date", "cutoff", "time", "日期", "时间"];

/// True when the column key or full name looks like a date column.
///
/// ```
/// use ranktab_normalization::is_date_column;
///
/// assert!(is_date_column("Knowledge Cutoff", ""));
/// assert!(is_date_column("发布", "发布日期"));
/// assert!(!is_date_column("MMLU", "Massive Multitask"));
/// ```
pub fn is_date_column(key: &str, full_name: &str) -> bool {
    let key = key.to_lowercase();
    let full_name = full_name.to_lowercase();
    DATE_MARKERS
        .iter()
        .any(|marker| key.contains(marker) || full_name.contains(marker))
}

/// Rewrite `2024/6/1` as `2024.6.1`.
pub fn normalize_date_value(value: &str) -> String {
    value.replace('/', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_is_case_insensitive() {
        assert!(is_date_column("RELEASE DATE", ""));
        assert!(is_date_column("x", "Training TIME"));
        assert!(is_date_column("更新时间", ""));
    }

    #[test]
    fn every_separator_is_rewritten() {
        assert_eq!(normalize_date_value("2024/6/1"), "2024.6.1");
        assert_eq!(normalize_date_value("2024.6"), "2024.6");
    }
}
