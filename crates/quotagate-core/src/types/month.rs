//! Calendar month used to partition the quota ledger.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;

/// A `(year, month)` pair rendered as `YYYY-MM`.
///
/// Ledger entries are keyed per billing month, so quota never carries
/// across a month boundary. Months are taken in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BillingMonth {
    year: i32,
    month: u32,
}

impl BillingMonth {
    /// Create a month, validating the month number.
    pub fn new(year: i32, month: u32) -> Result<Self, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::validation(format!(
                "Month must be between 1 and 12, got {month}"
            )));
        }
        if !(0..=9999).contains(&year) {
            return Err(AppError::validation(format!(
                "Year must have four digits, got {year}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The current UTC month.
    pub fn current() -> Self {
        Self::of(&Utc::now())
    }

    /// The month a timestamp falls in.
    pub fn of<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// The following month.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BillingMonth {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .filter(|(y, m)| y.len() == 4 && m.len() == 2)
            .ok_or_else(|| AppError::validation(format!("Expected YYYY-MM, got '{s}'")))?;

        let year = year
            .parse::<i32>()
            .map_err(|_| AppError::validation(format!("Invalid year in '{s}'")))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| AppError::validation(format!("Invalid month in '{s}'")))?;

        Self::new(year, month)
    }
}

impl Serialize for BillingMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BillingMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_zero_pads() {
        let month = BillingMonth::new(2026, 3).unwrap();
        assert_eq!(month.to_string(), "2026-03");
    }

    #[test]
    fn test_parse() {
        let month: BillingMonth = "2025-11".parse().unwrap();
        assert_eq!(month.year(), 2025);
        assert_eq!(month.month(), 11);
        assert!("2025-13".parse::<BillingMonth>().is_err());
        assert!("2025-1".parse::<BillingMonth>().is_err());
        assert!("november".parse::<BillingMonth>().is_err());
    }

    #[test]
    fn test_next_rolls_over_year() {
        let december = BillingMonth::new(2026, 12).unwrap();
        assert_eq!(december.next().to_string(), "2027-01");
    }

    #[test]
    fn test_of_timestamp() {
        let at = Utc.with_ymd_and_hms(2026, 10, 31, 23, 59, 59).unwrap();
        assert_eq!(BillingMonth::of(&at).to_string(), "2026-10");
    }

    #[test]
    fn test_serde_as_string() {
        let month = BillingMonth::new(2026, 1).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"2026-01\"");
        let back: BillingMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month);
    }
}
