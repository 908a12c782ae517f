//! Normalization statistics for the fmprep preprocessing pipeline.
//!
//! NaN-skipping moments over slices, plus a [`StatsAccumulator`] that records
//! weighted partial statistics per worker and pools them after merging.

mod accumulator;
mod error;
mod moments;
mod name;

pub use accumulator::{Observation, StatsAccumulator, StatsEntry};
pub use error::StatsError;
pub use moments::{nan_mean, nan_std, nan_sum, nan_var, weighted_mean, weighted_rms};
pub use name::StatName;
