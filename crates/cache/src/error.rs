//! Error types for fmprep-cache.

use std::path::PathBuf;

/// Error type for all fallible operations in the fmprep-cache crate.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Returned when a version or collection name cannot be used as a path
    /// component.
    #[error("invalid {what} '{name}': {reason}")]
    InvalidName {
        /// Which name is invalid (`version` or `collection`).
        what: &'static str,
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Returned when a file-system operation fails.
    #[error("{op} {}: {reason}", path.display())]
    FileSystem {
        /// Operation attempted.
        op: &'static str,
        /// Path involved.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a cache entry is requested that does not exist.
    #[error("no cache entry at {}", path.display())]
    Missing {
        /// Expected path.
        path: PathBuf,
    },

    /// Labeled-array error.
    #[error(transparent)]
    Array(#[from] fmprep_array::ArrayError),

    /// NetCDF codec error.
    #[error(transparent)]
    Io(#[from] fmprep_io::IoError),

    /// Statistics pooling error.
    #[error(transparent)]
    Stats(#[from] fmprep_stats::StatsError),
}

impl CacheError {
    pub(crate) fn fs(op: &'static str, path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        CacheError::FileSystem {
            op,
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_name() {
        let e = CacheError::InvalidName {
            what: "collection",
            name: "stats".to_string(),
            reason: "reserved for statistics files",
        };
        assert_eq!(
            e.to_string(),
            "invalid collection 'stats': reserved for statistics files"
        );
    }

    #[test]
    fn display_file_system() {
        let e = CacheError::fs("create directory", "/cache/v1", "permission denied");
        assert_eq!(e.to_string(), "create directory /cache/v1: permission denied");
    }

    #[test]
    fn display_missing() {
        let e = CacheError::Missing {
            path: PathBuf::from("/cache/v1/2000-01.nc"),
        };
        assert_eq!(e.to_string(), "no cache entry at /cache/v1/2000-01.nc");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<CacheError>();
    }
}
