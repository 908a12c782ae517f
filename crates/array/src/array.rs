//! The named-axis array type.

use std::collections::BTreeMap;

use ndarray::{ArrayD, Axis, IxDyn};
use serde::{Deserialize, Serialize};

use crate::attrs::{AttrValue, Attrs};
use crate::coord::{CANONICAL_ORDER, Coordinate};
use crate::error::ArrayError;

/// An n-dimensional `f64` array with named axes, optional per-axis
/// coordinates and an attribute map.
///
/// # Example
///
/// ```
/// use fmprep_array::{Coordinate, LabeledArray};
/// use ndarray::{ArrayD, IxDyn};
///
/// let data = ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![0.0; 6]).unwrap();
/// let arr = LabeledArray::new("T2M", &["y", "x"], data)
///     .unwrap()
///     .with_coord("x", Coordinate::Values(vec![0.0, 1.0, 2.0]))
///     .unwrap();
/// assert_eq!(arr.len_of("x"), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledArray {
    name: String,
    dims: Vec<String>,
    data: ArrayD<f64>,
    coords: BTreeMap<String, Coordinate>,
    attrs: Attrs,
}

impl LabeledArray {
    /// Creates an array with no coordinates or attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::RankMismatch`] if `dims` does not match the data
    /// rank, or [`ArrayError::DuplicateDim`] if a name repeats.
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        dims: &[S],
        data: ArrayD<f64>,
    ) -> Result<Self, ArrayError> {
        let dims: Vec<String> = dims.iter().map(|d| d.as_ref().to_string()).collect();
        if dims.len() != data.ndim() {
            return Err(ArrayError::RankMismatch {
                dims: dims.len(),
                ndim: data.ndim(),
            });
        }
        for (i, d) in dims.iter().enumerate() {
            if dims[..i].contains(d) {
                return Err(ArrayError::DuplicateDim { name: d.clone() });
            }
        }
        Ok(Self {
            name: name.into(),
            dims,
            data,
            coords: BTreeMap::new(),
            attrs: Attrs::new(),
        })
    }

    /// Creates an array from a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::ShapeMismatch`] if `values` does not fill `shape`.
    pub fn from_vec<S: AsRef<str>>(
        name: impl Into<String>,
        dims: &[S],
        shape: &[usize],
        values: Vec<f64>,
    ) -> Result<Self, ArrayError> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)?;
        Self::new(name, dims, data)
    }

    /// Attaches a coordinate to `dim`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::MissingDim`] or [`ArrayError::CoordinateLength`].
    pub fn with_coord(mut self, dim: &str, coord: impl Into<Coordinate>) -> Result<Self, ArrayError> {
        self.set_coord(dim, coord)?;
        Ok(self)
    }

    /// Sets (or replaces) the coordinate of `dim`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::MissingDim`] or [`ArrayError::CoordinateLength`].
    pub fn set_coord(&mut self, dim: &str, coord: impl Into<Coordinate>) -> Result<(), ArrayError> {
        let coord = coord.into();
        let len = self.require_len(dim)?;
        if coord.len() != len {
            return Err(ArrayError::CoordinateLength {
                dim: dim.to_string(),
                expected: len,
                got: coord.len(),
            });
        }
        self.coords.insert(dim.to_string(), coord);
        Ok(())
    }

    /// Adds attributes, overriding existing keys.
    pub fn with_attrs(mut self, attrs: &Attrs) -> Self {
        self.update_attrs(attrs);
        self
    }

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the variable.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Dimension names in axis order.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Axis lengths.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// The underlying data.
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Mutable access to the data. The shape must not change.
    pub fn data_mut(&mut self) -> &mut ArrayD<f64> {
        &mut self.data
    }

    /// Consumes the array, returning its data.
    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if the array has an axis called `dim`.
    pub fn has_dim(&self, dim: &str) -> bool {
        self.dims.iter().any(|d| d == dim)
    }

    /// Axis index of `dim`.
    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// Length of axis `dim`.
    pub fn len_of(&self, dim: &str) -> Option<usize> {
        self.axis_of(dim).map(|a| self.data.len_of(Axis(a)))
    }

    /// All coordinates.
    pub fn coords(&self) -> &BTreeMap<String, Coordinate> {
        &self.coords
    }

    /// Coordinate of `dim`.
    pub fn coord(&self, dim: &str) -> Option<&Coordinate> {
        self.coords.get(dim)
    }

    /// Numeric coordinate values of `dim`.
    pub fn coord_values(&self, dim: &str) -> Option<&[f64]> {
        self.coords.get(dim).and_then(Coordinate::values)
    }

    /// Attribute map.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Attribute lookup.
    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// Sets one attribute.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Removes one attribute, returning it.
    pub fn remove_attr(&mut self, key: &str) -> Option<AttrValue> {
        self.attrs.remove(key)
    }

    /// Merges `attrs` into this array's attributes, overriding existing keys.
    pub fn update_attrs(&mut self, attrs: &Attrs) {
        for (k, v) in attrs {
            self.attrs.insert(k.clone(), v.clone());
        }
    }

    /// Replaces the whole attribute map.
    pub fn set_attrs(&mut self, attrs: Attrs) {
        self.attrs = attrs;
    }

    /// Count of NaN cells.
    pub fn count_nan(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }

    /// Renames axes (and their coordinates) according to `table`.
    /// Entries naming absent axes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::DuplicateDim`] if a rename would collide with an
    /// existing axis.
    pub fn rename_dims(mut self, table: &BTreeMap<String, String>) -> Result<Self, ArrayError> {
        let renamed: Vec<String> = self
            .dims
            .iter()
            .map(|d| table.get(d).cloned().unwrap_or_else(|| d.clone()))
            .collect();
        for (i, d) in renamed.iter().enumerate() {
            if renamed[..i].contains(d) {
                return Err(ArrayError::DuplicateDim { name: d.clone() });
            }
        }
        let coords = std::mem::take(&mut self.coords);
        self.coords = coords
            .into_iter()
            .map(|(k, v)| (table.get(&k).cloned().unwrap_or(k), v))
            .collect();
        self.dims = renamed;
        Ok(self)
    }

    /// Selects one index along `dim` and drops the axis.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::MissingDim`] or [`ArrayError::IndexOutOfBounds`].
    pub fn isel(&self, dim: &str, index: usize) -> Result<Self, ArrayError> {
        let axis = self.require_axis(dim)?;
        let len = self.data.len_of(Axis(axis));
        if index >= len {
            return Err(ArrayError::IndexOutOfBounds {
                dim: dim.to_string(),
                index,
                len,
            });
        }
        let data = self.data.index_axis(Axis(axis), index).to_owned();
        let mut dims = self.dims.clone();
        dims.remove(axis);
        let mut coords = self.coords.clone();
        coords.remove(dim);
        Ok(Self {
            name: self.name.clone(),
            dims,
            data,
            coords,
            attrs: self.attrs.clone(),
        })
    }

    /// Keeps the given indices along `dim`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::MissingDim`] or [`ArrayError::IndexOutOfBounds`].
    pub fn select_indices(&self, dim: &str, indices: &[usize]) -> Result<Self, ArrayError> {
        let axis = self.require_axis(dim)?;
        let len = self.data.len_of(Axis(axis));
        if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
            return Err(ArrayError::IndexOutOfBounds {
                dim: dim.to_string(),
                index: bad,
                len,
            });
        }
        let data = self.data.select(Axis(axis), indices);
        let mut coords = self.coords.clone();
        if let Some(c) = coords.get_mut(dim) {
            *c = c.select(indices);
        }
        Ok(Self {
            name: self.name.clone(),
            dims: self.dims.clone(),
            data,
            coords,
            attrs: self.attrs.clone(),
        })
    }

    /// Keeps entries along `dim` whose coordinate satisfies `keep`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::MissingCoordinate`] if `dim` has no numeric coordinate.
    pub fn select_where(&self, dim: &str, keep: impl Fn(f64) -> bool) -> Result<Self, ArrayError> {
        let values = self.require_values(dim)?;
        let indices: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| keep(v))
            .map(|(i, _)| i)
            .collect();
        self.select_indices(dim, &indices)
    }

    /// Half-open coordinate range selection `lo <= c < hi`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::MissingCoordinate`] if `dim` has no numeric coordinate.
    pub fn select_range(&self, dim: &str, lo: f64, hi: f64) -> Result<Self, ArrayError> {
        self.select_where(dim, |c| c >= lo && c < hi)
    }

    /// Index of the coordinate entry nearest to `value` (first on ties).
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::MissingCoordinate`] if `dim` has no numeric
    /// coordinate, or [`ArrayError::EmptyInput`] if the axis is empty.
    pub fn nearest_index(&self, dim: &str, value: f64) -> Result<usize, ArrayError> {
        let values = self.require_values(dim)?;
        values
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - value)
                    .abs()
                    .partial_cmp(&(*b - value).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
            .ok_or(ArrayError::EmptyInput)
    }

    /// Reorders axes so those named in `order` come first, in that order;
    /// names in `order` that the array lacks are skipped, and remaining axes
    /// keep their relative order after them.
    pub fn transpose_to(self, order: &[&str]) -> Self {
        let mut perm: Vec<usize> = order.iter().filter_map(|d| self.axis_of(d)).collect();
        for i in 0..self.dims.len() {
            if !perm.contains(&i) {
                perm.push(i);
            }
        }
        if perm.iter().enumerate().all(|(i, &p)| i == p) {
            return self;
        }
        let dims = perm.iter().map(|&p| self.dims[p].clone()).collect();
        let data = self.data.permuted_axes(IxDyn(&perm));
        Self {
            name: self.name,
            dims,
            data: data.as_standard_layout().into_owned(),
            coords: self.coords,
            attrs: self.attrs,
        }
    }

    /// Transposes to the canonical `(t, z, y, x)` order.
    pub fn canonical_order(self) -> Self {
        self.transpose_to(&CANONICAL_ORDER)
    }

    pub(crate) fn require_axis(&self, dim: &str) -> Result<usize, ArrayError> {
        self.axis_of(dim).ok_or_else(|| ArrayError::MissingDim {
            name: dim.to_string(),
            available: self.dims.join(", "),
        })
    }

    pub(crate) fn require_len(&self, dim: &str) -> Result<usize, ArrayError> {
        let axis = self.require_axis(dim)?;
        Ok(self.data.len_of(Axis(axis)))
    }

    pub(crate) fn require_values(&self, dim: &str) -> Result<&[f64], ArrayError> {
        self.require_axis(dim)?;
        self.coord_values(dim)
            .ok_or_else(|| ArrayError::MissingCoordinate {
                dim: dim.to_string(),
            })
    }

    /// Assembles an array from already-consistent parts.
    pub(crate) fn from_parts(
        name: String,
        dims: Vec<String>,
        data: ArrayD<f64>,
        coords: BTreeMap<String, Coordinate>,
        attrs: Attrs,
    ) -> Self {
        debug_assert_eq!(dims.len(), data.ndim());
        Self {
            name,
            dims,
            data,
            coords,
            attrs,
        }
    }
}
