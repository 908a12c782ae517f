//! Error types for the fmprep-regrid crate.

/// Error type for resampling operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegridError {
    /// Returned when configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a variable lacks the coordinate needed to resolve a
    /// target grid.
    #[error("cannot resolve '{axis}' target: {reason}")]
    UnresolvedAxis {
        /// Canonical axis name.
        axis: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// Gap filling error.
    #[error(transparent)]
    Gap(#[from] GapError),

    /// Array error.
    #[error(transparent)]
    Array(#[from] fmprep_array::ArrayError),
}

/// Error type for the gap filler.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GapError {
    /// Returned when NaNs remain after filling, which happens for lanes
    /// without any valid sample.
    #[error("{count} NaN value(s) remain in '{variable}' after gap filling along '{dim}'")]
    ResidualNans {
        /// Variable name.
        variable: String,
        /// Axis filled along.
        dim: String,
        /// NaN cells remaining.
        count: usize,
    },

    /// Array error.
    #[error(transparent)]
    Array(#[from] fmprep_array::ArrayError),
}
