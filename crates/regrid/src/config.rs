//! Configuration for the grid resampler.

use std::collections::BTreeSet;

use fmprep_array::CoordinateMapper;

use crate::error::RegridError;
use crate::quantity::QuantityType;

/// Target grid and aggregation settings shared by every unit of a run.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use fmprep_array::CoordinateMapper;
/// use fmprep_regrid::GridConfig;
///
/// let config = GridConfig::new()
///     .with_xres(1.0)
///     .with_yres(1.0)
///     .with_tstep_seconds(6 * 3600)
///     .with_extensive(["PRECTOT"])
///     .with_dims(CoordinateMapper::from_pairs([("lon", "x"), ("lat", "y")]));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridConfig {
    xres: Option<f64>,
    yres: Option<f64>,
    xext: Option<(f64, f64)>,
    yext: Option<(f64, f64)>,
    levels: Option<Vec<f64>>,
    tstep_seconds: Option<i64>,
    extensive: BTreeSet<String>,
    dims: CoordinateMapper,
}

impl GridConfig {
    /// Creates a pass-through configuration: no regridding, no temporal
    /// aggregation, no renaming.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the longitude resolution in degrees.
    pub fn with_xres(mut self, res: f64) -> Self {
        self.xres = Some(res);
        self
    }

    /// Sets the latitude resolution in degrees.
    pub fn with_yres(mut self, res: f64) -> Self {
        self.yres = Some(res);
        self
    }

    /// Sets the half-open longitude extent `[lo, hi)`.
    pub fn with_xext(mut self, lo: f64, hi: f64) -> Self {
        self.xext = Some((lo, hi));
        self
    }

    /// Sets the half-open latitude extent `[lo, hi)`.
    pub fn with_yext(mut self, lo: f64, hi: f64) -> Self {
        self.yext = Some((lo, hi));
        self
    }

    /// Sets the vertical levels to interpolate onto.
    pub fn with_levels(mut self, levels: Vec<f64>) -> Self {
        self.levels = Some(levels);
        self
    }

    /// Sets the temporal aggregation step in seconds.
    pub fn with_tstep_seconds(mut self, step: i64) -> Self {
        self.tstep_seconds = Some(step);
        self
    }

    /// Sets the variables aggregated by sum.
    pub fn with_extensive<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensive = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the source → canonical axis rename table.
    pub fn with_dims(mut self, dims: CoordinateMapper) -> Self {
        self.dims = dims;
        self
    }

    // --- Accessors ---

    /// Returns the longitude resolution.
    pub fn xres(&self) -> Option<f64> {
        self.xres
    }

    /// Returns the latitude resolution.
    pub fn yres(&self) -> Option<f64> {
        self.yres
    }

    /// Returns the longitude extent.
    pub fn xext(&self) -> Option<(f64, f64)> {
        self.xext
    }

    /// Returns the latitude extent.
    pub fn yext(&self) -> Option<(f64, f64)> {
        self.yext
    }

    /// Returns the vertical levels.
    pub fn levels(&self) -> Option<&[f64]> {
        self.levels.as_deref()
    }

    /// Returns the temporal step in seconds.
    pub fn tstep_seconds(&self) -> Option<i64> {
        self.tstep_seconds
    }

    /// Returns the axis rename table.
    pub fn dims(&self) -> &CoordinateMapper {
        &self.dims
    }

    /// Quantity type of `variable`: extensive if listed, intensive otherwise.
    pub fn quantity_type(&self, variable: &str) -> QuantityType {
        if self.extensive.contains(variable) {
            QuantityType::Extensive
        } else {
            QuantityType::Intensive
        }
    }

    /// Validates this configuration.
    ///
    /// Checks that resolutions and the step are positive, extents are
    /// ordered, and the level list, when given, is non-empty and finite.
    pub fn validate(&self) -> Result<(), RegridError> {
        for (name, res) in [("xres", self.xres), ("yres", self.yres)] {
            if let Some(r) = res
                && (!r.is_finite() || r <= 0.0)
            {
                return Err(RegridError::InvalidConfig {
                    reason: format!("{name} must be finite and positive, got {r}"),
                });
            }
        }
        for (name, ext) in [("xext", self.xext), ("yext", self.yext)] {
            if let Some((lo, hi)) = ext
                && (!lo.is_finite() || !hi.is_finite() || lo >= hi)
            {
                return Err(RegridError::InvalidConfig {
                    reason: format!("{name} must satisfy lo < hi, got [{lo}, {hi}]"),
                });
            }
        }
        if let Some(levels) = &self.levels {
            if levels.is_empty() {
                return Err(RegridError::InvalidConfig {
                    reason: "levels must not be empty when given".to_string(),
                });
            }
            if levels.iter().any(|l| !l.is_finite()) {
                return Err(RegridError::InvalidConfig {
                    reason: "levels must be finite".to_string(),
                });
            }
        }
        if let Some(step) = self.tstep_seconds
            && step <= 0
        {
            return Err(RegridError::InvalidConfig {
                reason: format!("tstep must be positive, got {step} s"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_through() {
        let c = GridConfig::new();
        assert!(c.validate().is_ok());
        assert!(c.xres().is_none());
        assert!(c.levels().is_none());
        assert!(c.dims().is_empty());
    }

    #[test]
    fn rejects_non_positive_resolution() {
        assert!(GridConfig::new().with_xres(0.0).validate().is_err());
        assert!(GridConfig::new().with_yres(f64::NAN).validate().is_err());
    }

    #[test]
    fn rejects_reversed_extent() {
        assert!(GridConfig::new().with_yext(10.0, -10.0).validate().is_err());
    }

    #[test]
    fn rejects_empty_levels_and_step() {
        assert!(GridConfig::new().with_levels(vec![]).validate().is_err());
        assert!(GridConfig::new().with_tstep_seconds(0).validate().is_err());
    }

    #[test]
    fn quantity_type_membership() {
        let c = GridConfig::new().with_extensive(["PRECTOT"]);
        assert_eq!(c.quantity_type("PRECTOT"), QuantityType::Extensive);
        assert_eq!(c.quantity_type("T2M"), QuantityType::Intensive);
    }
}
