//! Axis coordinates and canonical axis names.

use serde::{Deserialize, Serialize};

/// Canonical time axis. Coordinate values are seconds since the Unix epoch.
pub const T: &str = "t";
/// Canonical vertical axis.
pub const Z: &str = "z";
/// Canonical meridional axis (latitude).
pub const Y: &str = "y";
/// Canonical zonal axis (longitude).
pub const X: &str = "x";
/// Synthetic axis enumerating stacked features.
pub const FEATURE: &str = "feature";

/// Canonical axis order for transposition.
pub const CANONICAL_ORDER: [&str; 4] = [T, Z, Y, X];

/// Coordinate vector attached to one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Coordinate {
    /// Numeric positions (degrees, levels, epoch seconds).
    Values(Vec<f64>),
    /// Text labels, used by the feature axis.
    Labels(Vec<String>),
}

impl Coordinate {
    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Coordinate::Values(v) => v.len(),
            Coordinate::Labels(l) => l.len(),
        }
    }

    /// Returns `true` if the coordinate is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric values, if this is a numeric coordinate.
    pub fn values(&self) -> Option<&[f64]> {
        match self {
            Coordinate::Values(v) => Some(v),
            Coordinate::Labels(_) => None,
        }
    }

    /// Labels, if this is a label coordinate.
    pub fn labels(&self) -> Option<&[String]> {
        match self {
            Coordinate::Labels(l) => Some(l),
            Coordinate::Values(_) => None,
        }
    }

    /// Picks entries by index, preserving the coordinate kind.
    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        match self {
            Coordinate::Values(v) => Coordinate::Values(indices.iter().map(|&i| v[i]).collect()),
            Coordinate::Labels(l) => {
                Coordinate::Labels(indices.iter().map(|&i| l[i].clone()).collect())
            }
        }
    }

    /// Appends `other` when both are of the same kind.
    pub(crate) fn concat(&self, other: &Coordinate) -> Option<Self> {
        match (self, other) {
            (Coordinate::Values(a), Coordinate::Values(b)) => {
                Some(Coordinate::Values(a.iter().chain(b).copied().collect()))
            }
            (Coordinate::Labels(a), Coordinate::Labels(b)) => {
                Some(Coordinate::Labels(a.iter().chain(b).cloned().collect()))
            }
            _ => None,
        }
    }
}

impl From<Vec<f64>> for Coordinate {
    fn from(v: Vec<f64>) -> Self {
        Coordinate::Values(v)
    }
}

impl From<Vec<String>> for Coordinate {
    fn from(l: Vec<String>) -> Self {
        Coordinate::Labels(l)
    }
}

/// Returns `true` if `values` is non-decreasing.
pub fn is_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}
