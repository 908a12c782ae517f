//! Error types for fmprep-batch.

/// Error type for all fallible operations in the fmprep-batch crate.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Returned when the task configuration is invalid.
    #[error("invalid task configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a derived feature needs a coordinate no variable has.
    #[error("missing coordinate '{name}' required for {purpose}")]
    MissingCoordinate {
        /// Model-facing coordinate name.
        name: String,
        /// What needed it.
        purpose: &'static str,
    },

    /// Returned when a time-varying variable is absent from a slice being
    /// merged.
    #[error("variable '{name}' missing from batch slice {index}")]
    MissingVariable {
        /// Variable name.
        name: String,
        /// Index of the offending slice.
        index: usize,
    },

    /// Returned when there is nothing to merge or stack.
    #[error("empty batch: {reason}")]
    EmptyBatch {
        /// Description of what was empty.
        reason: &'static str,
    },

    /// Returned when a cached unit has no time steps on a requested date.
    #[error("no time steps of '{variable}' in collection '{collection}' on {date}")]
    NoTimesteps {
        /// Source variable name.
        variable: String,
        /// Collection the variable was read from.
        collection: String,
        /// Requested date.
        date: String,
    },

    /// Cache access error.
    #[error(transparent)]
    Cache(#[from] fmprep_cache::CacheError),

    /// Date arithmetic error.
    #[error(transparent)]
    Calendar(#[from] fmprep_calendar::CalendarError),

    /// Labeled-array error.
    #[error(transparent)]
    Array(#[from] fmprep_array::ArrayError),
}
