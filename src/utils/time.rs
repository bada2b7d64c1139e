//! Time helpers
//!
//! Timestamps are stored as Unix epoch milliseconds throughout the database.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

/// Current time as Unix epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert epoch milliseconds to a UTC datetime, clamping invalid values to epoch
pub fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Month bucket key ("YYYY-MM") for an epoch-millisecond timestamp
pub fn month_key(millis: i64) -> String {
    let dt = from_millis(millis);
    format!("{:04}-{:02}", dt.year(), dt.month())
}

/// The trailing `months` month keys ending at `now`, oldest first.
///
/// Used to zero-fill monthly aggregation windows so every month in the
/// window is present in the output.
pub fn trailing_month_keys(now: DateTime<Utc>, months: u32) -> Vec<String> {
    let first_of_month = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .unwrap_or(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default());

    (0..months)
        .rev()
        .filter_map(|back| first_of_month.checked_sub_months(Months::new(back)))
        .map(|d| format!("{:04}-{:02}", d.year(), d.month()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_key() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(month_key(dt.timestamp_millis()), "2026-03");
    }

    #[test]
    fn test_trailing_month_keys_spans_year_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap();
        let keys = trailing_month_keys(now, 6);
        assert_eq!(
            keys,
            vec!["2025-09", "2025-10", "2025-11", "2025-12", "2026-01", "2026-02"]
        );
    }

    #[test]
    fn test_trailing_month_keys_single() {
        let now = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();
        assert_eq!(trailing_month_keys(now, 1), vec!["2026-07"]);
    }
}
