//! Date range for filtering calendar events.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default window around "now" when no explicit bounds are given.
const DEFAULT_RANGE_DAYS: i64 = 60;

/// Date range for filtering events.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl Default for DateRange {
    /// Default range: ±DEFAULT_RANGE_DAYS from now
    fn default() -> Self {
        let now = Utc::now();
        DateRange {
            from: Some(now - Duration::days(DEFAULT_RANGE_DAYS)),
            to: Some(now + Duration::days(DEFAULT_RANGE_DAYS)),
        }
    }
}

impl DateRange {
    /// Parse CLI date arguments into a DateRange.
    /// - `from`: "start" for unbounded, or YYYY-MM-DD
    /// - `to`: YYYY-MM-DD, defaults to +DEFAULT_RANGE_DAYS if not specified
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> Result<Self, String> {
        let now = Utc::now();

        let from_dt = match from {
            Some("start") => None, // Unbounded past
            Some(s) => Some(parse_date_start(s)?),
            None => Some(now - Duration::days(DEFAULT_RANGE_DAYS)),
        };

        let to_dt = match to {
            Some(s) => Some(parse_date_end(s)?),
            None => Some(now + Duration::days(DEFAULT_RANGE_DAYS)),
        };

        Ok(DateRange {
            from: from_dt,
            to: to_dt,
        })
    }

    /// True if the instant falls within the (inclusive) range.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(from) = self.from
            && instant < from
        {
            return false;
        }
        if let Some(to) = self.to
            && instant > to
        {
            return false;
        }
        true
    }
}

/// Parse YYYY-MM-DD as start of day in UTC
fn parse_date_start(s: &str) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap().and_utc())
}

/// Parse YYYY-MM-DD as end of day in UTC
fn parse_date_end(s: &str) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))?;
    Ok(date.and_hms_opt(23, 59, 59).unwrap().and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args_parses_bounds() {
        let range = DateRange::from_args(Some("2025-06-01"), Some("2025-06-30")).unwrap();
        assert!(range.contains("2025-06-15T12:00:00Z".parse().unwrap()));
        assert!(!range.contains("2025-07-01T00:00:00Z".parse().unwrap()));
        assert!(!range.contains("2025-05-31T23:59:59Z".parse().unwrap()));
    }

    #[test]
    fn test_start_keyword_means_unbounded_past() {
        let range = DateRange::from_args(Some("start"), Some("2025-06-30")).unwrap();
        assert!(range.from.is_none());
        assert!(range.contains("1999-01-01T00:00:00Z".parse().unwrap()));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        assert!(DateRange::from_args(Some("June 1st"), None).is_err());
    }
}
