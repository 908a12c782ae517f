//! Date sequence generation.

use crate::date::Date;
use crate::error::CalendarError;

/// Generates `n_days` consecutive dates starting at `start`.
///
/// # Example
///
/// ```
/// use fmprep_calendar::{Date, date_sequence};
///
/// let start = Date::new(2000, 12, 30).unwrap();
/// let dates = date_sequence(start, 4);
/// assert_eq!(dates.len(), 4);
/// assert_eq!(dates[3], Date::new(2001, 1, 2).unwrap());
/// ```
pub fn date_sequence(start: Date, n_days: usize) -> Vec<Date> {
    let mut dates = Vec::with_capacity(n_days);
    if n_days == 0 {
        return dates;
    }
    dates.push(start);
    let mut current = start;
    for _ in 1..n_days {
        current = current.next();
        dates.push(current);
    }
    dates
}

/// Every date from `start` to `end`, both inclusive.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidRange`] if `end < start`.
pub fn date_range(start: Date, end: Date) -> Result<Vec<Date>, CalendarError> {
    if end < start {
        return Err(CalendarError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    let n = (end.to_naive() - start.to_naive()).num_days() as usize + 1;
    Ok(date_sequence(start, n))
}
