//! Error types for fmprep-stats.

/// Error type for all fallible operations in the fmprep-stats crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// Returned when a statistic name is not recognised.
    #[error("unknown statistic '{name}'")]
    UnknownStatistic {
        /// The unrecognised name.
        name: String,
    },

    /// Returned when partial observations of one variable cannot be pooled
    /// because their shapes differ.
    #[error("cannot pool '{stat}' for '{variable}': {reason}")]
    IncompatibleObservations {
        /// Variable name.
        variable: String,
        /// Statistic name.
        stat: String,
        /// Description of the disagreement.
        reason: String,
    },

    /// Array error.
    #[error(transparent)]
    Array(#[from] fmprep_array::ArrayError),
}
