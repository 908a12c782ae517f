//! Processing periods: a year, a month of a year, or a single day.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::date::{Date, SECONDS_PER_DAY, days_in_month};
use crate::error::CalendarError;

/// Granularity at which sources are cached and processed in parallel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One unit per calendar year.
    Year,
    /// One unit per calendar month.
    #[default]
    Month,
    /// One unit per day.
    Day,
}

/// A contiguous calendar span at some [`Granularity`].
///
/// `month` is set for month and day periods, `day` only for day periods.
/// The derived ordering is chronological among periods of the same
/// granularity. Serializes as its [`key`](TimePeriod::key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimePeriod {
    year: i32,
    month: Option<u8>,
    day: Option<u8>,
}

impl TimePeriod {
    /// A whole calendar year.
    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// A calendar month.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
    pub fn month(year: i32, month: u8) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        Ok(Self {
            year,
            month: Some(month),
            day: None,
        })
    }

    /// A single day.
    pub fn day(date: Date) -> Self {
        Self {
            year: date.year(),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }

    /// The period of the given granularity that contains `date`.
    pub fn containing(date: Date, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Year => Self::year(date.year()),
            Granularity::Month => Self {
                year: date.year(),
                month: Some(date.month()),
                day: None,
            },
            Granularity::Day => Self::day(date),
        }
    }

    /// Returns this period's granularity.
    pub fn granularity(&self) -> Granularity {
        match (self.month, self.day) {
            (_, Some(_)) => Granularity::Day,
            (Some(_), None) => Granularity::Month,
            (None, None) => Granularity::Year,
        }
    }

    /// Returns the year.
    pub fn year_value(&self) -> i32 {
        self.year
    }

    /// Returns the month, if this is a month or day period.
    pub fn month_value(&self) -> Option<u8> {
        self.month
    }

    /// Returns the day, if this is a day period.
    pub fn day_value(&self) -> Option<u8> {
        self.day
    }

    /// First date of the period.
    pub fn first_date(&self) -> Date {
        let month = self.month.unwrap_or(1);
        let day = self.day.unwrap_or(1);
        Date::new(self.year, month, day).expect("period fields are validated on construction")
    }

    /// Last date of the period.
    pub fn last_date(&self) -> Date {
        match (self.month, self.day) {
            (Some(_), Some(_)) => self.first_date(),
            (Some(m), None) => Date::new(self.year, m, days_in_month(self.year, m))
                .expect("last day of a valid month"),
            _ => Date::new(self.year, 12, 31).expect("Dec 31 is always valid"),
        }
    }

    /// Returns `true` if `date` falls within this period.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year
            && self.month.is_none_or(|m| m == date.month())
            && self.day.is_none_or(|d| d == date.day())
    }

    /// Half-open `[start, end)` bounds in seconds since the Unix epoch.
    pub fn epoch_bounds(&self) -> (i64, i64) {
        (
            self.first_date().epoch_seconds(),
            self.last_date().epoch_seconds() + SECONDS_PER_DAY,
        )
    }

    /// Path-safe key: `2000`, `2000-01`, or `2000-01-15`.
    pub fn key(&self) -> String {
        match (self.month, self.day) {
            (Some(m), Some(d)) => format!("{:04}-{m:02}-{d:02}", self.year),
            (Some(m), None) => format!("{:04}-{m:02}", self.year),
            _ => format!("{:04}", self.year),
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for TimePeriod {
    type Err = CalendarError;

    /// Parses a key: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidDateString {
            input: s.to_string(),
        };
        let parts: Vec<&str> = s.split('-').collect();
        match parts.as_slice() {
            [y] => Ok(Self::year(y.parse().map_err(|_| invalid())?)),
            [y, m] => Self::month(
                y.parse().map_err(|_| invalid())?,
                m.parse().map_err(|_| invalid())?,
            ),
            [_, _, _] => Ok(Self::day(s.parse()?)),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for TimePeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimePeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// All periods of `granularity` overlapping `[start, end]`, in order.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidRange`] if `end < start`.
pub fn periods_between(
    start: Date,
    end: Date,
    granularity: Granularity,
) -> Result<Vec<TimePeriod>, CalendarError> {
    if end < start {
        return Err(CalendarError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    let mut periods = Vec::new();
    let mut current = TimePeriod::containing(start, granularity);
    let last = TimePeriod::containing(end, granularity);
    loop {
        periods.push(current);
        if current == last {
            break;
        }
        current = TimePeriod::containing(current.last_date().next(), granularity);
    }
    Ok(periods)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct_per_granularity() {
        let date = Date::new(2000, 1, 5).unwrap();
        assert_eq!(TimePeriod::containing(date, Granularity::Year).key(), "2000");
        assert_eq!(
            TimePeriod::containing(date, Granularity::Month).key(),
            "2000-01"
        );
        assert_eq!(
            TimePeriod::containing(date, Granularity::Day).key(),
            "2000-01-05"
        );
    }

    #[test]
    fn month_bounds() {
        let period = TimePeriod::month(2000, 2).unwrap();
        assert_eq!(period.first_date(), Date::new(2000, 2, 1).unwrap());
        assert_eq!(period.last_date(), Date::new(2000, 2, 29).unwrap());
        let (lo, hi) = period.epoch_bounds();
        assert_eq!(hi - lo, 29 * SECONDS_PER_DAY);
    }

    #[test]
    fn invalid_month_rejected() {
        assert_eq!(
            TimePeriod::month(2000, 13).unwrap_err(),
            CalendarError::InvalidMonth { month: 13 }
        );
    }

    #[test]
    fn contains() {
        let period = TimePeriod::month(1999, 12).unwrap();
        assert!(period.contains(Date::new(1999, 12, 31).unwrap()));
        assert!(!period.contains(Date::new(2000, 12, 1).unwrap()));
    }

    #[test]
    fn granularity_round_trip() {
        let date = Date::new(2003, 7, 9).unwrap();
        for g in [Granularity::Year, Granularity::Month, Granularity::Day] {
            assert_eq!(TimePeriod::containing(date, g).granularity(), g);
        }
    }

    #[test]
    fn periods_between_months_across_year() {
        let start = Date::new(1999, 11, 20).unwrap();
        let end = Date::new(2000, 2, 1).unwrap();
        let keys: Vec<String> = periods_between(start, end, Granularity::Month)
            .unwrap()
            .iter()
            .map(TimePeriod::key)
            .collect();
        assert_eq!(keys, vec!["1999-11", "1999-12", "2000-01", "2000-02"]);
    }

    #[test]
    fn parse_keys() {
        for key in ["1999", "1999-12", "2000-02-29"] {
            assert_eq!(key.parse::<TimePeriod>().unwrap().key(), key);
        }
        assert!("2000-13".parse::<TimePeriod>().is_err());
        assert!("2001-02-29".parse::<TimePeriod>().is_err());
        assert!("two-thousand".parse::<TimePeriod>().is_err());
    }

    #[test]
    fn serializes_as_key() {
        let period = TimePeriod::month(2000, 1).unwrap();
        assert_eq!(serde_json::to_string(&period).unwrap(), "\"2000-01\"");
        let back: TimePeriod = serde_json::from_str("\"2000-01\"").unwrap();
        assert_eq!(back, period);
    }

    #[test]
    fn periods_between_days() {
        let start = Date::new(2000, 2, 28).unwrap();
        let end = Date::new(2000, 3, 1).unwrap();
        let periods = periods_between(start, end, Granularity::Day).unwrap();
        assert_eq!(periods.len(), 3);
    }
}
