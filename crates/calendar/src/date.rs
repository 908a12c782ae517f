//! Gregorian calendar date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CalendarError;

/// Number of seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// An immutable, validated Gregorian date.
///
/// Field order matters: the derived ordering is lexicographic on
/// `(year, month, day)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    year: i32,
    month: u8,
    day: u8,
}

impl Date {
    /// Creates a new `Date` from year, month (1..=12) and day.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] or [`CalendarError::InvalidDay`]
    /// if the triple does not name a real Gregorian day.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        if NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day)).is_none() {
            return Err(CalendarError::InvalidDay { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Converts a chrono date. Infallible since chrono dates are always valid.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month() as u8,
            day: date.day() as u8,
        }
    }

    /// Returns the UTC calendar date containing `seconds` since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::TimestampOutOfRange`] if chrono cannot
    /// represent the instant.
    pub fn from_epoch_seconds(seconds: i64) -> Result<Self, CalendarError> {
        chrono::DateTime::from_timestamp(seconds, 0)
            .map(|dt| Self::from_naive(dt.date_naive()))
            .ok_or(CalendarError::TimestampOutOfRange { seconds })
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u8 {
        self.month
    }

    /// Returns the day within the month (1..=31).
    pub fn day(self) -> u8 {
        self.day
    }

    /// Returns the equivalent chrono date.
    pub fn to_naive(self) -> NaiveDate {
        // Safety: the constructors only admit dates chrono accepted.
        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day))
            .expect("Date always holds a valid Gregorian day")
    }

    /// Seconds since the Unix epoch at 00:00 UTC of this date.
    pub fn epoch_seconds(self) -> i64 {
        self.to_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc()
            .timestamp()
    }

    /// File-path-safe compact form `YYYYMMDD`.
    pub fn compact(self) -> String {
        format!("{:04}{:02}{:02}", self.year, self.month, self.day)
    }

    /// Returns the next calendar day.
    pub fn next(self) -> Self {
        Self::from_naive(self.to_naive().succ_opt().unwrap_or(NaiveDate::MAX))
    }

    /// Returns the number of days in this date's month.
    pub fn days_in_month(self) -> u8 {
        days_in_month(self.year, self.month)
    }
}

/// Number of days in `month` of `year`. `month` must be 1..=12.
pub(crate) fn days_in_month(year: i32, month: u8) -> u8 {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, u32::from(month) + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(ny, nm, 1);
    let first = NaiveDate::from_ymd_opt(year, u32::from(month), 1);
    match (first, first_next) {
        (Some(a), Some(b)) => (b - a).num_days() as u8,
        _ => 31,
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for Date {
    type Err = CalendarError;

    /// Parses `YYYY-MM-DD` or `YYYYMMDD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
            .map_err(|_| CalendarError::InvalidDateString {
                input: s.to_string(),
            })?;
        Ok(Self::from_naive(parsed))
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
