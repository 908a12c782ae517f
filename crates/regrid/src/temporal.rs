//! Temporal aggregation onto a fixed step.

use fmprep_array::{ArrayError, LabeledArray, T};
use fmprep_calendar::SECONDS_PER_DAY;
use ndarray::{ArrayD, IxDyn};

use crate::quantity::Aggregation;

/// Global attribute holding the 1-based month of the unit being processed.
pub const MONTH_ATTR: &str = "month";

/// Minimum spacing of consecutive steps in a year of monthly means.
pub const MONTHLY_MIN_STEP_SECONDS: i64 = 28 * SECONDS_PER_DAY;

/// Returns `true` for a year of monthly means: exactly 12 time steps, each
/// at least [`MONTHLY_MIN_STEP_SECONDS`] after the previous one.
pub fn is_monthly(array: &LabeledArray) -> bool {
    if array.len_of(T) != Some(12) {
        return false;
    }
    array.coord_values(T).is_some_and(|t| {
        t.windows(2)
            .all(|w| w[1] - w[0] >= MONTHLY_MIN_STEP_SECONDS as f64)
    })
}

/// Aggregates `array` onto buckets of `step` seconds along `t`.
///
/// Buckets are anchored at UTC midnight of the first sample's day and
/// labelled by their start. Every bucket between the first and last sample
/// is emitted; empty buckets reduce an empty slice. Arrays without a time
/// axis, or with a single time step, pass through unchanged. The result has
/// `t` as its leading axis.
///
/// # Errors
///
/// Returns [`ArrayError::MissingCoordinate`] if the time axis has no
/// coordinate.
pub fn aggregate_time(
    array: LabeledArray,
    step: i64,
    aggregation: Aggregation,
) -> Result<LabeledArray, ArrayError> {
    match array.len_of(T) {
        None | Some(0) | Some(1) => return Ok(array),
        Some(_) => {}
    }
    let times = array
        .coord_values(T)
        .ok_or_else(|| ArrayError::MissingCoordinate { dim: T.to_string() })?
        .to_vec();

    let step_f = step as f64;
    let t0 = times.iter().copied().fold(f64::INFINITY, f64::min);
    let anchor = ((t0 as i64).div_euclid(SECONDS_PER_DAY) * SECONDS_PER_DAY) as f64;
    let bucket_of = |t: f64| ((t - anchor) / step_f).floor() as i64;

    let first = bucket_of(t0);
    let last = times.iter().map(|&t| bucket_of(t)).max().unwrap_or(first);
    let n_buckets = (last - first + 1) as usize;
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); n_buckets];
    for (i, &t) in times.iter().enumerate() {
        members[(bucket_of(t) - first) as usize].push(i);
    }

    let ordered = array.transpose_to(&[T]);
    let nt = times.len();
    let cells = ordered.len() / nt;
    let flat: Vec<f64> = ordered.data().iter().copied().collect();

    let mut out = Vec::with_capacity(n_buckets * cells);
    let mut samples = Vec::new();
    for idx in &members {
        for c in 0..cells {
            samples.clear();
            samples.extend(idx.iter().map(|&i| flat[i * cells + c]));
            out.push(aggregation.apply(&samples));
        }
    }

    let mut shape = ordered.shape().to_vec();
    shape[0] = n_buckets;
    let labels: Vec<f64> = (0..n_buckets)
        .map(|k| anchor + (first + k as i64) as f64 * step_f)
        .collect();

    let mut result = LabeledArray::new(
        ordered.name(),
        ordered.dims(),
        ArrayD::from_shape_vec(IxDyn(&shape), out)?,
    )?
    .with_attrs(ordered.attrs());
    for (dim, coord) in ordered.coords() {
        if dim != T {
            result.set_coord(dim, coord.clone())?;
        }
    }
    result.set_coord(T, labels)?;
    Ok(result)
}
