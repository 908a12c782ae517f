//! Reductions over named axes.

use ndarray::{ArrayD, IxDyn};

use crate::array::LabeledArray;
use crate::error::ArrayError;

impl LabeledArray {
    /// Reduces the named axes with `f`, which receives every value of one
    /// reduction group as a contiguous slice.
    ///
    /// Names the array does not have are ignored. Kept axes retain their order
    /// and coordinates; reducing every axis yields a 0-d array.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::ShapeMismatch`] if the output cannot be shaped
    /// (not expected for consistent inputs).
    ///
    /// # Example
    ///
    /// ```
    /// use fmprep_array::LabeledArray;
    ///
    /// let arr = LabeledArray::from_vec("v", &["t", "x"], &[2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// let sums = arr.reduce(&["t"], |g| g.iter().sum()).unwrap();
    /// assert_eq!(sums.dims(), &["x"]);
    /// assert_eq!(sums.data().as_slice().unwrap(), &[4.0, 6.0]);
    /// ```
    pub fn reduce<F>(&self, dims: &[&str], f: F) -> Result<LabeledArray, ArrayError>
    where
        F: Fn(&[f64]) -> f64,
    {
        let reduced: Vec<usize> = (0..self.dims().len())
            .filter(|&i| dims.contains(&self.dims()[i].as_str()))
            .collect();
        let kept: Vec<usize> = (0..self.dims().len())
            .filter(|i| !reduced.contains(i))
            .collect();

        let mut perm = kept.clone();
        perm.extend(&reduced);
        let group: usize = reduced.iter().map(|&a| self.shape()[a]).product();
        let out_shape: Vec<usize> = kept.iter().map(|&a| self.shape()[a]).collect();

        let permuted = self.data().view().permuted_axes(IxDyn(&perm));
        let flat: Vec<f64> = permuted.iter().copied().collect();
        let values: Vec<f64> = if group == 0 {
            let n: usize = out_shape.iter().product();
            (0..n).map(|_| f(&[])).collect()
        } else {
            flat.chunks(group).map(&f).collect()
        };
        let data = ArrayD::from_shape_vec(IxDyn(&out_shape), values)?;

        let out_dims: Vec<String> = kept.iter().map(|&a| self.dims()[a].clone()).collect();
        let coords = self
            .coords()
            .iter()
            .filter(|(k, _)| out_dims.contains(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(LabeledArray::from_parts(
            self.name().to_string(),
            out_dims,
            data,
            coords,
            self.attrs().clone(),
        ))
    }
}
