//! Error types for fmprep-array.

/// Error type for all fallible operations in the fmprep-array crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArrayError {
    /// Returned when the number of dimension names differs from the data rank.
    #[error("rank mismatch: {dims} dimension names for {ndim}-d data")]
    RankMismatch {
        /// Number of dimension names supplied.
        dims: usize,
        /// Rank of the data.
        ndim: usize,
    },

    /// Returned when a dimension name appears twice.
    #[error("duplicate dimension '{name}'")]
    DuplicateDim {
        /// The repeated name.
        name: String,
    },

    /// Returned when an operation names a dimension the array does not have.
    #[error("dimension '{name}' not found (dims: {available})")]
    MissingDim {
        /// The requested dimension.
        name: String,
        /// Comma-separated list of the array's dimensions.
        available: String,
    },

    /// Returned when an operation needs a numeric coordinate that is absent.
    #[error("no numeric coordinate for dimension '{dim}'")]
    MissingCoordinate {
        /// Dimension lacking the coordinate.
        dim: String,
    },

    /// Returned when a coordinate's length differs from its axis length.
    #[error("coordinate '{dim}' has {got} values, axis has {expected}")]
    CoordinateLength {
        /// Dimension name.
        dim: String,
        /// Axis length.
        expected: usize,
        /// Coordinate length.
        got: usize,
    },

    /// Returned when an index is outside an axis.
    #[error("index {index} out of bounds for '{dim}' (len {len})")]
    IndexOutOfBounds {
        /// Dimension name.
        dim: String,
        /// Requested index.
        index: usize,
        /// Axis length.
        len: usize,
    },

    /// Returned when arrays that must agree in shape or dims do not.
    #[error("shape mismatch: {reason}")]
    ShapeMismatch {
        /// Description of the disagreement.
        reason: String,
    },

    /// Returned when an operation receives no input arrays.
    #[error("no arrays to combine")]
    EmptyInput,
}

impl From<ndarray::ShapeError> for ArrayError {
    fn from(e: ndarray::ShapeError) -> Self {
        ArrayError::ShapeMismatch {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_dim() {
        let err = ArrayError::MissingDim {
            name: "z".to_string(),
            available: "t, y, x".to_string(),
        };
        assert_eq!(err.to_string(), "dimension 'z' not found (dims: t, y, x)");
    }

    #[test]
    fn display_coordinate_length() {
        let err = ArrayError::CoordinateLength {
            dim: "x".to_string(),
            expected: 4,
            got: 3,
        };
        assert_eq!(err.to_string(), "coordinate 'x' has 3 values, axis has 4");
    }

    #[test]
    fn from_shape_error() {
        let e = ndarray::ArrayD::<f64>::from_shape_vec(ndarray::IxDyn(&[2, 2]), vec![1.0])
            .unwrap_err();
        let err: ArrayError = e.into();
        assert!(matches!(err, ArrayError::ShapeMismatch { .. }));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<ArrayError>();
    }
}
