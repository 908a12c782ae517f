//! Error types for the fmprep-calendar crate.

/// Error type for all fallible operations in the fmprep-calendar crate.
///
/// Covers validation failures for calendar dates, time periods, and
/// timestamp conversions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum CalendarError {
    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a day number does not exist in the given month.
    #[error("invalid day: {day} for {year}-{month:02}")]
    InvalidDay {
        /// The year of the rejected date.
        year: i32,
        /// The month of the rejected date.
        month: u8,
        /// The invalid day number that was provided.
        day: u8,
    },

    /// Returned when a date string cannot be parsed.
    #[error("invalid date string: '{input}' (expected YYYY-MM-DD or YYYYMMDD)")]
    InvalidDateString {
        /// The rejected input.
        input: String,
    },

    /// Returned when a timestamp is outside the representable range.
    #[error("timestamp out of range: {seconds} s since epoch")]
    TimestampOutOfRange {
        /// Seconds since the Unix epoch.
        seconds: i64,
    },

    /// Returned when a range end precedes its start.
    #[error("invalid range: end {end} precedes start {start}")]
    InvalidRange {
        /// Start of the range.
        start: String,
        /// End of the range.
        end: String,
    },
}
