//! Combining and reshaping arrays: concatenation, feature stacking,
//! broadcasting and first differences.

use std::collections::BTreeMap;

use ndarray::{ArrayD, Axis, IxDyn, Slice};

use crate::array::LabeledArray;
use crate::coord::{Coordinate, FEATURE};
use crate::error::ArrayError;

/// Concatenates arrays along an existing axis `dim`.
///
/// All inputs must share dims and every other axis length. The coordinate of
/// `dim` is joined when every input carries one; other coordinates and the
/// attributes come from the first input.
///
/// # Errors
///
/// Returns [`ArrayError::EmptyInput`] for no inputs, or
/// [`ArrayError::ShapeMismatch`] when inputs disagree.
pub fn concat(arrays: &[LabeledArray], dim: &str) -> Result<LabeledArray, ArrayError> {
    let first = arrays.first().ok_or(ArrayError::EmptyInput)?;
    let axis = first.require_axis(dim)?;
    for a in &arrays[1..] {
        if a.dims() != first.dims() {
            return Err(ArrayError::ShapeMismatch {
                reason: format!(
                    "'{}' has dims [{}], expected [{}]",
                    a.name(),
                    a.dims().join(", "),
                    first.dims().join(", ")
                ),
            });
        }
    }
    let views: Vec<_> = arrays.iter().map(|a| a.data().view()).collect();
    let data = ndarray::concatenate(Axis(axis), &views)?;

    let mut coords = first.coords().clone();
    coords.remove(dim);
    let mut joined = first.coord(dim).cloned();
    for a in &arrays[1..] {
        joined = match (joined, a.coord(dim)) {
            (Some(acc), Some(c)) => acc.concat(c),
            _ => None,
        };
    }
    if let Some(c) = joined {
        coords.insert(dim.to_string(), c);
    }
    Ok(LabeledArray::from_parts(
        first.name().to_string(),
        first.dims().to_vec(),
        data,
        coords,
        first.attrs().clone(),
    ))
}

/// Stacks same-shaped arrays along a new trailing `feature` axis labelled by
/// `labels`.
///
/// # Errors
///
/// Returns [`ArrayError::EmptyInput`], or [`ArrayError::ShapeMismatch`] when
/// inputs differ in dims/shape or `labels` has the wrong length.
pub fn stack_features(
    name: &str,
    arrays: &[LabeledArray],
    labels: Vec<String>,
) -> Result<LabeledArray, ArrayError> {
    let first = arrays.first().ok_or(ArrayError::EmptyInput)?;
    if labels.len() != arrays.len() {
        return Err(ArrayError::ShapeMismatch {
            reason: format!("{} labels for {} features", labels.len(), arrays.len()),
        });
    }
    for a in &arrays[1..] {
        if a.dims() != first.dims() || a.shape() != first.shape() {
            return Err(ArrayError::ShapeMismatch {
                reason: format!(
                    "feature '{}' has shape {:?}, expected {:?}",
                    a.name(),
                    a.shape(),
                    first.shape()
                ),
            });
        }
    }
    let trailing = Axis(first.dims().len());
    let views: Vec<_> = arrays.iter().map(|a| a.data().view()).collect();
    let data = ndarray::stack(trailing, &views)?;

    let mut dims = first.dims().to_vec();
    dims.push(FEATURE.to_string());
    let mut coords = first.coords().clone();
    coords.insert(FEATURE.to_string(), Coordinate::Labels(labels));
    Ok(LabeledArray::from_parts(
        name.to_string(),
        dims,
        data,
        coords,
        BTreeMap::new(),
    ))
}

impl LabeledArray {
    /// Broadcasts onto `dims` (a superset of this array's dims) with lengths
    /// from `shape`, ordering axes as in `dims`. Coordinates for new axes are
    /// taken from `coords` when present.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::ShapeMismatch`] if this array has an axis missing
    /// from `dims` or with a different length.
    pub fn broadcast_to(
        &self,
        dims: &[String],
        shape: &[usize],
        coords: &BTreeMap<String, Coordinate>,
    ) -> Result<LabeledArray, ArrayError> {
        if dims.len() != shape.len() {
            return Err(ArrayError::RankMismatch {
                dims: dims.len(),
                ndim: shape.len(),
            });
        }
        for (d, &len) in self.dims().iter().zip(self.shape()) {
            match dims.iter().position(|t| t == d) {
                Some(p) if shape[p] == len => {}
                _ => {
                    return Err(ArrayError::ShapeMismatch {
                        reason: format!("cannot broadcast '{}' axis '{d}' (len {len})", self.name()),
                    });
                }
            }
        }

        let order: Vec<&str> = dims
            .iter()
            .map(String::as_str)
            .filter(|d| self.has_dim(d))
            .collect();
        let ordered = self.clone().transpose_to(&order);
        let mut view = ordered.data().view();
        for (i, d) in dims.iter().enumerate() {
            if !self.has_dim(d) {
                view = view.insert_axis(Axis(i));
            }
        }
        let data = view
            .broadcast(IxDyn(shape))
            .ok_or_else(|| ArrayError::ShapeMismatch {
                reason: format!("cannot broadcast '{}' to {shape:?}", self.name()),
            })?
            .to_owned();

        let mut out_coords = ordered.coords().clone();
        for d in dims {
            if !out_coords.contains_key(d)
                && let Some(c) = coords.get(d)
            {
                out_coords.insert(d.clone(), c.clone());
            }
        }
        Ok(LabeledArray::from_parts(
            self.name().to_string(),
            dims.to_vec(),
            data,
            out_coords,
            self.attrs().clone(),
        ))
    }

    /// First difference along `dim`: `a[i+1] - a[i]`, labelled by the upper
    /// coordinate. An axis of length `n` yields length `n - 1`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::MissingDim`].
    pub fn diff(&self, dim: &str) -> Result<LabeledArray, ArrayError> {
        let axis = self.require_axis(dim)?;
        let len = self.shape()[axis];
        let mut coords = self.coords().clone();
        if len == 0 {
            return Ok(self.clone());
        }
        let upper = self.data().slice_axis(Axis(axis), Slice::from(1..));
        let lower = self.data().slice_axis(Axis(axis), Slice::from(..len - 1));
        let data: ArrayD<f64> = &upper - &lower;
        if let Some(c) = coords.get_mut(dim) {
            let tail: Vec<usize> = (1..len).collect();
            *c = c.select(&tail);
        }
        Ok(LabeledArray::from_parts(
            self.name().to_string(),
            self.dims().to_vec(),
            data,
            coords,
            self.attrs().clone(),
        ))
    }
}
