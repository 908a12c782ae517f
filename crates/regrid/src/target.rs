//! Target coordinates resolved once per unit.

use fmprep_array::{LabeledArray, X, Y};

use crate::config::GridConfig;
use crate::error::RegridError;

/// What to do with one horizontal axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisTarget {
    /// Interpolate onto these positions.
    Grid(Vec<f64>),
    /// Keep source positions in `[lo, hi)`.
    Range(f64, f64),
    /// Leave the axis untouched.
    PassThrough,
}

/// Immutable target coordinates for x, y and z.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetCoords {
    /// Longitude target.
    pub x: AxisTarget,
    /// Latitude target.
    pub y: AxisTarget,
    /// Vertical levels, if configured.
    pub z: Option<Vec<f64>>,
}

impl TargetCoords {
    /// Resolves targets from `config` and a raw source variable.
    ///
    /// With a resolution configured the target is the evenly spaced grid
    /// `start, start + res, ...` below `stop`, where `(start, stop)` is the
    /// configured extent, or the source span widened by half a cell at the
    /// top when no extent is given. With only an extent the axis is sliced.
    /// Source coordinates are looked up under their raw names, so `source`
    /// need not be renamed yet.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::UnresolvedAxis`] when an auto extent is needed
    /// but the source has no coordinate for that axis.
    pub fn resolve(config: &GridConfig, source: &LabeledArray) -> Result<Self, RegridError> {
        let inverse = config.dims().inverse();
        let resolve_axis = |axis: &'static str,
                            res: Option<f64>,
                            ext: Option<(f64, f64)>|
         -> Result<AxisTarget, RegridError> {
            match (res, ext) {
                (Some(res), Some((lo, hi))) => Ok(AxisTarget::Grid(arange(lo, hi, res))),
                (Some(res), None) => {
                    let raw = inverse.map_name(axis);
                    let values = source.coord_values(raw).filter(|v| !v.is_empty()).ok_or_else(|| {
                        RegridError::UnresolvedAxis {
                            axis,
                            reason: format!("source '{}' has no '{raw}' coordinate", source.name()),
                        }
                    })?;
                    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
                    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    Ok(AxisTarget::Grid(arange(lo, hi + res / 2.0, res)))
                }
                (None, Some((lo, hi))) => Ok(AxisTarget::Range(lo, hi)),
                (None, None) => Ok(AxisTarget::PassThrough),
            }
        };
        Ok(Self {
            x: resolve_axis(X, config.xres(), config.xext())?,
            y: resolve_axis(Y, config.yres(), config.yext())?,
            z: config.levels().map(<[f64]>::to_vec),
        })
    }
}

/// Evenly spaced values `start + i*step` strictly below `stop`.
pub(crate) fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || stop <= start {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}
