//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use fmprep_array::{CANONICAL_ORDER, CoordinateMapper};
use fmprep_batch::TaskConfig;
use fmprep_regrid::GridConfig;

use crate::config::*;

/// Builds a [`GridConfig`] from the TOML preprocess configuration.
pub fn build_grid_config(pre: &PreprocessToml) -> Result<GridConfig> {
    for axis in pre.dims.values() {
        if !CANONICAL_ORDER.contains(&axis.as_str()) {
            bail!("unknown canonical axis {axis:?} in [preprocess].dims (expected one of {CANONICAL_ORDER:?})");
        }
    }
    let mut cfg = GridConfig::new()
        .with_extensive(pre.extensive.iter().cloned())
        .with_dims(CoordinateMapper::new(pre.dims.clone()));
    if let Some(res) = pre.xres {
        cfg = cfg.with_xres(res);
    }
    if let Some(res) = pre.yres {
        cfg = cfg.with_yres(res);
    }
    if let Some([lo, hi]) = pre.xext {
        cfg = cfg.with_xext(lo, hi);
    }
    if let Some([lo, hi]) = pre.yext {
        cfg = cfg.with_yext(lo, hi);
    }
    if let Some(ref levels) = pre.levels {
        cfg = cfg.with_levels(levels.clone());
    }
    if let Some(hours) = pre.tstep_hours {
        if hours == 0 {
            bail!("[preprocess].tstep_hours must be positive");
        }
        cfg = cfg.with_tstep_seconds(i64::from(hours) * 3600);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`TaskConfig`] from the TOML task configuration.
pub fn build_task_config(task: &TaskToml) -> Result<TaskConfig> {
    for axis in task.coords.keys() {
        if !CANONICAL_ORDER.contains(&axis.as_str()) {
            bail!("unknown canonical axis {axis:?} in [task].coords (expected one of {CANONICAL_ORDER:?})");
        }
    }
    let mut cfg = TaskConfig::new()
        .with_collections(task.collections.iter().cloned())
        .with_input_variables(task.input_variables.clone())
        .with_coords(CoordinateMapper::new(task.coords.clone()))
        .with_constants(task.constants.iter().cloned())
        .with_granularity(task.granularity);
    if let Some(ref levels) = task.levels {
        cfg = cfg.with_levels(levels.clone());
    }
    cfg.validate()?;
    Ok(cfg)
}
