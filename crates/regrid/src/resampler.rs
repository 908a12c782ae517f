//! The per-variable resampling pipeline.

use fmprep_array::{AttrValue, Attrs, LabeledArray, T, X, Y, Z};
use tracing::debug;

use crate::config::GridConfig;
use crate::error::RegridError;
use crate::gap::replace_nans;
use crate::quantity::QuantityType;
use crate::sentinel::{SENTINEL_KEYS, mask_sentinel};
use crate::target::{AxisTarget, TargetCoords};
use crate::temporal::{MONTH_ATTR, aggregate_time, is_monthly};

/// Attribute recording the quantity type of a processed variable.
pub const QTYPE_ATTR: &str = "qtype";

/// Maps raw source variables onto the canonical grid.
#[derive(Debug, Clone)]
pub struct Resampler {
    config: GridConfig,
}

impl Resampler {
    /// Creates a resampler after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::InvalidConfig`] if validation fails.
    pub fn new(config: GridConfig) -> Result<Self, RegridError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Resolves the unit's target coordinates from a raw source variable.
    ///
    /// # Errors
    ///
    /// See [`TargetCoords::resolve`].
    pub fn resolve_targets(&self, source: &LabeledArray) -> Result<TargetCoords, RegridError> {
        TargetCoords::resolve(&self.config, source)
    }

    /// Resamples one raw variable.
    ///
    /// Steps: rename axes; take the first time slice of constants; mask the
    /// sentinel; interpolate onto the x, y and z targets; aggregate over
    /// time; fill gaps along y; transpose to canonical order.
    ///
    /// A year of monthly means (see [`is_monthly`]) is not aggregated: the
    /// step of the unit's month ([`MONTH_ATTR`] in `global_attrs`) is
    /// selected and the time axis dropped, or all 12 steps are kept when the
    /// unit has no month. The result's attributes are `global_attrs`
    /// overridden by the variable's own, plus the quantity type under
    /// [`QTYPE_ATTR`].
    ///
    /// # Errors
    ///
    /// Returns [`RegridError::Array`] for missing coordinates or rename
    /// collisions, and [`RegridError::Gap`] if gaps remain.
    pub fn subsample(
        &self,
        variable: LabeledArray,
        global_attrs: &Attrs,
        quantity: QuantityType,
        is_constant: bool,
        targets: &TargetCoords,
    ) -> Result<LabeledArray, RegridError> {
        let dims = self
            .config
            .dims()
            .restricted_to(|d| variable.has_dim(d) || variable.coord(d).is_some());
        let mut arr = dims.apply(variable)?;
        if is_constant && arr.has_dim(T) {
            arr = arr.isel(T, 0)?;
        }
        arr = mask_sentinel(arr);

        arr = apply_horizontal(arr, X, &targets.x)?;
        arr = apply_horizontal(arr, Y, &targets.y)?;
        if let Some(levels) = &targets.z
            && arr.has_dim(Z)
        {
            let assume_sorted = levels.first() <= levels.last();
            arr = arr.interp_axis(Z, levels, assume_sorted)?;
        }

        if is_monthly(&arr) {
            match unit_month(global_attrs) {
                Some(month) => arr = arr.isel(T, month - 1)?,
                None => debug!(variable = arr.name(), "monthly series kept whole"),
            }
        } else if let Some(step) = self.config.tstep_seconds() {
            arr = aggregate_time(arr, step, quantity.aggregation())?;
        }

        arr = replace_nans(arr, Y)?;

        let mut attrs: Attrs = global_attrs
            .iter()
            .filter(|(k, _)| !SENTINEL_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        attrs.extend(arr.attrs().iter().map(|(k, v)| (k.clone(), v.clone())));
        attrs.insert(QTYPE_ATTR.to_string(), quantity.as_str().into());
        arr.set_attrs(attrs);

        let arr = arr.canonical_order();
        debug!(
            variable = arr.name(),
            dims = ?arr.dims(),
            shape = ?arr.shape(),
            qtype = %quantity,
            "subsampled variable"
        );
        Ok(arr)
    }
}

fn unit_month(attrs: &Attrs) -> Option<usize> {
    match attrs.get(MONTH_ATTR) {
        Some(AttrValue::Num(m)) if (1.0..=12.0).contains(m) => Some(*m as usize),
        _ => None,
    }
}

fn apply_horizontal(
    arr: LabeledArray,
    dim: &str,
    target: &AxisTarget,
) -> Result<LabeledArray, RegridError> {
    if !arr.has_dim(dim) {
        return Ok(arr);
    }
    Ok(match target {
        AxisTarget::Grid(values) => arr.interp_axis(dim, values, true)?,
        AxisTarget::Range(lo, hi) => arr.select_range(dim, *lo, *hi)?,
        AxisTarget::PassThrough => arr,
    })
}
