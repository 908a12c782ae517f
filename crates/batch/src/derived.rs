//! Cyclical calendar-position features derived from time and longitude.
//!
//! Progress values lie in `[0, 1)`. Each progress is emitted raw and as
//! `sin(2π·p)` / `cos(2π·p)`.

use std::f64::consts::TAU;

use fmprep_array::{ArrayCollection, LabeledArray};
use ndarray::{Array1, Array2};

use crate::error::BatchError;

/// Seconds in a day.
pub const SEC_PER_DAY: f64 = 86_400.0;

/// Mean tropical year length in days.
pub const AVG_DAY_PER_YEAR: f64 = 365.242_19;

/// Name of the year-progress feature.
pub const YEAR_PROGRESS: &str = "year_progress";

/// Name of the day-progress feature.
pub const DAY_PROGRESS: &str = "day_progress";

/// Fraction of the mean year elapsed at `seconds` since the Unix epoch.
pub fn get_year_progress(seconds: f64) -> f64 {
    (seconds / SEC_PER_DAY / AVG_DAY_PER_YEAR).rem_euclid(1.0)
}

/// Local fraction of the day at `seconds` since the Unix epoch and
/// longitude `lon` in degrees.
pub fn get_day_progress(seconds: f64, lon: f64) -> f64 {
    let utc = seconds.rem_euclid(SEC_PER_DAY) / SEC_PER_DAY;
    (utc + lon.to_radians() / TAU).rem_euclid(1.0)
}

/// `(p, sin 2πp, cos 2πp)`.
pub fn featurize_progress(progress: f64) -> (f64, f64, f64) {
    let angle = progress * TAU;
    (progress, angle.sin(), angle.cos())
}

/// Builds the six progress features over `time_dim` and `lon_dim`.
///
/// Year progress spans `(time)`; day progress spans `(time, lon)`.
///
/// # Errors
///
/// Returns [`BatchError::Array`] if the coordinates cannot be attached.
pub fn progress_features(
    time_dim: &str,
    times: &[f64],
    lon_dim: &str,
    lons: &[f64],
) -> Result<Vec<LabeledArray>, BatchError> {
    let year = Array1::from_iter(times.iter().map(|&s| get_year_progress(s)));
    let day = Array2::from_shape_fn((times.len(), lons.len()), |(i, j)| {
        get_day_progress(times[i], lons[j])
    });

    let year_dims = [time_dim];
    let day_dims = [time_dim, lon_dim];
    let mut out = Vec::with_capacity(6);
    for (name, dims, data) in [
        (YEAR_PROGRESS, &year_dims[..], year.into_dyn()),
        (DAY_PROGRESS, &day_dims[..], day.into_dyn()),
    ] {
        let sin = data.mapv(|p| featurize_progress(p).1);
        let cos = data.mapv(|p| featurize_progress(p).2);
        for (suffix, values) in [("", data), ("_sin", sin), ("_cos", cos)] {
            let mut array = LabeledArray::new(format!("{name}{suffix}"), dims, values)?
                .with_coord(time_dim, times.to_vec())?;
            if dims.len() == 2 {
                array.set_coord(lon_dim, lons.to_vec())?;
            }
            out.push(array);
        }
    }
    Ok(out)
}

/// Numeric coordinate `dim` from the first variable carrying it.
pub(crate) fn find_coord<'a>(collection: &'a ArrayCollection, dim: &str) -> Option<&'a [f64]> {
    collection.iter().find_map(|a| a.coord_values(dim))
}
