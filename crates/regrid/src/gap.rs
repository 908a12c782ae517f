//! Gap filling by linear interpolation and extrapolation along one axis.

use fmprep_array::LabeledArray;
use ndarray::{ArrayViewMut1, Axis};
use tracing::debug;

use crate::error::GapError;

/// Fills NaNs along `dim`.
///
/// Within each 1-D lane NaNs between valid samples are interpolated
/// linearly, and NaNs beyond the outermost valid samples are extrapolated
/// from the two nearest ones. A lane with a single valid sample is filled
/// with that value. Lanes are positioned by the coordinate of `dim`, or by
/// index without one. Arrays lacking `dim`, or without NaNs, are returned
/// unchanged.
///
/// # Errors
///
/// Returns [`GapError::ResidualNans`] if any lane has no valid sample.
///
/// # Example
///
/// ```
/// use fmprep_array::LabeledArray;
/// use fmprep_regrid::replace_nans;
///
/// let arr = LabeledArray::from_vec("v", &["y"], &[4], vec![f64::NAN, 1.0, f64::NAN, 3.0]).unwrap();
/// let filled = replace_nans(arr, "y").unwrap();
/// assert_eq!(filled.data().as_slice().unwrap(), &[0.0, 1.0, 2.0, 3.0]);
/// ```
pub fn replace_nans(mut array: LabeledArray, dim: &str) -> Result<LabeledArray, GapError> {
    let before = array.count_nan();
    if before == 0 {
        return Ok(array);
    }
    let Some(axis) = array.axis_of(dim) else {
        return Ok(array);
    };
    let len = array.shape()[axis];
    let positions: Vec<f64> = match array.coord_values(dim) {
        Some(v) => v.to_vec(),
        None => (0..len).map(|i| i as f64).collect(),
    };

    for lane in array.data_mut().lanes_mut(Axis(axis)) {
        fill_lane(lane, &positions);
    }

    let after = array.count_nan();
    if after > 0 {
        return Err(GapError::ResidualNans {
            variable: array.name().to_string(),
            dim: dim.to_string(),
            count: after,
        });
    }
    debug!(variable = array.name(), dim, filled = before, "filled gaps");
    Ok(array)
}

fn fill_lane(mut lane: ArrayViewMut1<f64>, xs: &[f64]) {
    let valid: Vec<usize> = (0..lane.len()).filter(|&i| !lane[i].is_nan()).collect();
    match valid.as_slice() {
        [] => {}
        [only] => {
            let v = lane[*only];
            lane.fill(v);
        }
        _ => {
            let line = |a: usize, b: usize, x: f64, lane: &ArrayViewMut1<f64>| {
                let span = xs[b] - xs[a];
                if span == 0.0 {
                    lane[a]
                } else {
                    lane[a] + (x - xs[a]) * (lane[b] - lane[a]) / span
                }
            };
            let n = valid.len();
            for i in 0..lane.len() {
                if !lane[i].is_nan() {
                    continue;
                }
                let hi = valid.partition_point(|&v| v < i);
                let (a, b) = if hi == 0 {
                    (valid[0], valid[1])
                } else if hi == n {
                    (valid[n - 2], valid[n - 1])
                } else {
                    (valid[hi - 1], valid[hi])
                };
                lane[i] = line(a, b, xs[i], &lane);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn interpolates_and_extrapolates() {
        let arr = LabeledArray::from_vec(
            "v",
            &["y"],
            &[6],
            vec![f64::NAN, 2.0, f64::NAN, f64::NAN, 8.0, f64::NAN],
        )
        .unwrap();
        let out = replace_nans(arr, "y").unwrap();
        assert_eq!(out.data().as_slice().unwrap(), &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn uses_coordinate_positions() {
        let arr = LabeledArray::from_vec("v", &["y"], &[3], vec![0.0, f64::NAN, 10.0])
            .unwrap()
            .with_coord("y", vec![0.0, 1.0, 10.0])
            .unwrap();
        let out = replace_nans(arr, "y").unwrap();
        assert_relative_eq!(out.data()[[1]], 1.0);
    }

    #[test]
    fn single_valid_sample_fills_lane() {
        let arr =
            LabeledArray::from_vec("v", &["y"], &[3], vec![f64::NAN, 5.0, f64::NAN]).unwrap();
        let out = replace_nans(arr, "y").unwrap();
        assert_eq!(out.data().as_slice().unwrap(), &[5.0, 5.0, 5.0]);
    }

    #[test]
    fn lanes_are_independent() {
        // dims (y, x); fill along y per column
        let arr = LabeledArray::from_vec(
            "v",
            &["y", "x"],
            &[3, 2],
            vec![0.0, f64::NAN, f64::NAN, 1.0, 2.0, 3.0],
        )
        .unwrap();
        let out = replace_nans(arr, "y").unwrap();
        assert_eq!(out.data()[[1, 0]], 1.0);
        assert_eq!(out.data()[[0, 1]], -1.0);
    }

    #[test]
    fn all_nan_lane_is_an_error() {
        let arr = LabeledArray::from_vec("QV", &["y", "x"], &[2, 2], vec![1.0, f64::NAN, 2.0, f64::NAN])
            .unwrap();
        let err = replace_nans(arr, "y").unwrap_err();
        assert_eq!(
            err,
            GapError::ResidualNans {
                variable: "QV".to_string(),
                dim: "y".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn missing_axis_unchanged() {
        let arr = LabeledArray::from_vec("v", &["x"], &[2], vec![1.0, f64::NAN]).unwrap();
        let out = replace_nans(arr.clone(), "y").unwrap();
        assert_eq!(out.count_nan(), 1);
    }
}
