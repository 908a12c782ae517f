//! Linear interpolation along one named axis.

use ndarray::{ArrayD, ArrayView1, ArrayViewMut1, Axis, IxDyn, Zip};

use crate::array::LabeledArray;
use crate::coord::{Coordinate, is_increasing};
use crate::error::ArrayError;

impl LabeledArray {
    /// Linearly interpolates onto `targets` along `dim`.
    ///
    /// Targets outside the source span become NaN. With `assume_sorted` the
    /// source coordinate is used as-is when increasing; otherwise it is sorted
    /// first. Applying this once per horizontal axis gives bilinear
    /// interpolation on a rectilinear grid.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::MissingDim`] or [`ArrayError::MissingCoordinate`].
    ///
    /// # Example
    ///
    /// ```
    /// use fmprep_array::LabeledArray;
    ///
    /// let arr = LabeledArray::from_vec("v", &["x"], &[3], vec![0.0, 10.0, 20.0])
    ///     .unwrap()
    ///     .with_coord("x", vec![0.0, 1.0, 2.0])
    ///     .unwrap();
    /// let out = arr.interp_axis("x", &[0.5, 1.5, 3.0], true).unwrap();
    /// let v = out.data().as_slice().unwrap();
    /// assert_eq!(v[0], 5.0);
    /// assert_eq!(v[1], 15.0);
    /// assert!(v[2].is_nan());
    /// ```
    pub fn interp_axis(
        &self,
        dim: &str,
        targets: &[f64],
        assume_sorted: bool,
    ) -> Result<LabeledArray, ArrayError> {
        let source = self.require_values(dim)?;
        if !assume_sorted || !is_increasing(source) {
            let mut order: Vec<usize> = (0..source.len()).collect();
            order.sort_by(|&a, &b| {
                source[a]
                    .partial_cmp(&source[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            return self.select_indices(dim, &order)?.interp_axis(dim, targets, true);
        }

        let axis = self.require_axis(dim)?;
        let mut shape = self.shape().to_vec();
        shape[axis] = targets.len();
        let mut out = ArrayD::from_elem(IxDyn(&shape), f64::NAN);

        Zip::from(out.lanes_mut(Axis(axis)))
            .and(self.data().lanes(Axis(axis)))
            .for_each(|o, s| interp_lane(source, s, targets, o));

        let mut coords = self.coords().clone();
        coords.insert(dim.to_string(), Coordinate::Values(targets.to_vec()));
        Ok(LabeledArray::from_parts(
            self.name().to_string(),
            self.dims().to_vec(),
            out,
            coords,
            self.attrs().clone(),
        ))
    }
}

/// Interpolates one lane; `xs` must be non-decreasing.
fn interp_lane(xs: &[f64], ys: ArrayView1<f64>, targets: &[f64], mut out: ArrayViewMut1<f64>) {
    let n = xs.len();
    if n == 0 {
        return;
    }
    for (slot, &t) in out.iter_mut().zip(targets) {
        if t.is_nan() || t < xs[0] || t > xs[n - 1] {
            *slot = f64::NAN;
            continue;
        }
        let hi = xs.partition_point(|&v| v <= t);
        if hi == 0 || hi >= n {
            // t equals the last coordinate
            *slot = ys[n - 1];
            continue;
        }
        let lo = hi - 1;
        let span = xs[hi] - xs[lo];
        *slot = if span == 0.0 {
            ys[lo]
        } else {
            let w = (t - xs[lo]) / span;
            ys[lo] + w * (ys[hi] - ys[lo])
        };
    }
}
