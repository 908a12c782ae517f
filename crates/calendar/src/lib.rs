//! # fmprep-calendar
//!
//! Gregorian date arithmetic for the preprocessing pipeline.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Date"] -->|".next()"| A
//!     A -->|"date_range()"| B["Vec of Date"]
//!     A -->|"TimePeriod::containing()"| C["TimePeriod"]
//!     C -->|"periods_between()"| D["Vec of TimePeriod"]
//!     C -->|".key()"| E["cache path component"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use fmprep_calendar::{Date, Granularity, TimePeriod, date_range};
//!
//! let start = Date::new(2000, 1, 30).unwrap();
//! let end = Date::new(2000, 2, 2).unwrap();
//! let dates = date_range(start, end).unwrap();
//! assert_eq!(dates.len(), 4);
//!
//! let unit = TimePeriod::containing(start, Granularity::Month);
//! assert_eq!(unit.key(), "2000-01");
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `date` | Validated Gregorian date |
//! | `period` | Year / month / day processing periods |
//! | `sequence` | Date sequence generation |
//! | `error` | Error types |

mod date;
mod error;
mod period;
mod sequence;

pub use date::{Date, SECONDS_PER_DAY};
pub use error::CalendarError;
pub use period::{Granularity, TimePeriod, periods_between};
pub use sequence::{date_range, date_sequence};
