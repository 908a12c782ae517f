//! Error types for fmprep-preprocess.

/// Error type for all fallible operations in the fmprep-preprocess crate.
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    /// Returned when a unit task is malformed.
    #[error("invalid unit '{unit}': {reason}")]
    InvalidUnit {
        /// Unit key.
        unit: String,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when the worker pool cannot be created.
    #[error("failed to build thread pool: {reason}")]
    ThreadPool {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Source read error.
    #[error(transparent)]
    Io(#[from] fmprep_io::IoError),

    /// Resampling error.
    #[error(transparent)]
    Regrid(#[from] fmprep_regrid::RegridError),

    /// Statistics error.
    #[error(transparent)]
    Stats(#[from] fmprep_stats::StatsError),

    /// Cache error.
    #[error(transparent)]
    Cache(#[from] fmprep_cache::CacheError),

    /// Labeled-array error.
    #[error(transparent)]
    Array(#[from] fmprep_array::ArrayError),
}
