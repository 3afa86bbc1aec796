//! Date-range precondition for analysis requests

use chrono::NaiveDate;

use crate::Result;
use crate::error::InsightsError;

/// Longest accepted range, in days (five years)
pub const MAX_RANGE_DAYS: i64 = 1825;

/// Parse a `YYYY-MM-DD` date
pub fn parse_iso_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| InsightsError::validation("Invalid date format. Use YYYY-MM-DD"))
}

/// Check that `start..=end` is ordered, not in the future relative to
/// `today`, and spans at most [`MAX_RANGE_DAYS`] days.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Result<()> {
    if start > end {
        return Err(InsightsError::validation("Start date must be before end date"));
    }
    if end > today {
        return Err(InsightsError::validation("End date cannot be in the future"));
    }
    if (end - start).num_days() > MAX_RANGE_DAYS {
        return Err(InsightsError::validation("Date range cannot exceed 5 years"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(text: &str) -> NaiveDate {
        parse_iso_date(text).unwrap()
    }

    #[rstest]
    #[case("2023-01-01", "2023-12-31", None)]
    #[case("2023-01-01", "2023-01-01", None)]
    #[case("2023-02-01", "2023-01-01", Some("Start date must be before end date"))]
    #[case("2024-01-01", "2024-07-01", Some("End date cannot be in the future"))]
    #[case("2018-01-01", "2023-01-01", Some("Date range cannot exceed 5 years"))]
    #[case("2018-01-02", "2023-01-01", None)]
    fn test_validate_date_range(
        #[case] start: &str,
        #[case] end: &str,
        #[case] expected: Option<&str>,
    ) {
        let today = d("2024-03-15");
        let result = validate_date_range(d(start), d(end), today);
        match expected {
            None => assert!(result.is_ok(), "{result:?}"),
            Some(message) => match result.unwrap_err() {
                InsightsError::Validation { message: actual } => assert_eq!(actual, message),
                other => panic!("unexpected error: {other}"),
            },
        }
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(d(" 2023-06-30 "), NaiveDate::from_ymd_opt(2023, 6, 30).unwrap());
        let err = parse_iso_date("06/30/2023").unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }
}
