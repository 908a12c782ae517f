//! Reading and writing [`ArrayCollection`]s as NetCDF files.
//!
//! Numeric coordinates are written as coordinate variables. Label coordinates
//! are written as an index variable whose `labels` attribute holds the labels
//! joined by [`LABEL_SEPARATOR`]. The canonical time coordinate carries
//! [`TIME_UNITS`].

use std::collections::BTreeMap;
use std::path::Path;

use fmprep_array::{ArrayCollection, AttrValue, Attrs, Coordinate, LabeledArray, T};
use tracing::debug;

use crate::error::IoError;
use crate::netcdf_read;

/// Units written on the time coordinate of cache files.
pub const TIME_UNITS: &str = "seconds since 1970-01-01 00:00:00";

/// Separator between labels in the `labels` attribute.
pub const LABEL_SEPARATOR: &str = "|";

const LABELS_ATTR: &str = "labels";

/// Writes `collection` to a new NetCDF file at `path`, replacing any file
/// already there.
///
/// # Errors
///
/// Returns [`IoError::DimensionMismatch`] if two variables disagree on a
/// dimension length, or [`IoError::Netcdf`] on write failure.
pub fn write_collection(path: &Path, collection: &ArrayCollection) -> Result<(), IoError> {
    let mut lengths: BTreeMap<String, usize> = BTreeMap::new();
    let mut coords: BTreeMap<String, Coordinate> = BTreeMap::new();
    for array in collection.iter() {
        for (dim, &len) in array.dims().iter().zip(array.shape()) {
            match lengths.get(dim) {
                Some(&expected) if expected != len => {
                    return Err(IoError::DimensionMismatch {
                        name: dim.clone(),
                        expected,
                        got: len,
                    });
                }
                Some(_) => {}
                None => {
                    lengths.insert(dim.clone(), len);
                }
            }
            if !coords.contains_key(dim)
                && let Some(c) = array.coord(dim)
            {
                coords.insert(dim.clone(), c.clone());
            }
        }
    }

    let mut file = netcdf::create(path)?;
    for (name, value) in collection.attrs() {
        put_attr_file(&mut file, name, value)?;
    }
    for (dim, &len) in &lengths {
        file.add_dimension(dim, len)?;
    }

    for (dim, coord) in &coords {
        if collection.contains(dim) {
            continue;
        }
        let mut var = file.add_variable::<f64>(dim, &[dim.as_str()])?;
        match coord {
            Coordinate::Values(values) => {
                if dim == T {
                    var.put_attribute("units", TIME_UNITS)?;
                }
                var.put_values(values, ..)?;
            }
            Coordinate::Labels(labels) => {
                var.put_attribute(LABELS_ATTR, labels.join(LABEL_SEPARATOR))?;
                let index: Vec<f64> = (0..labels.len()).map(|i| i as f64).collect();
                var.put_values(&index, ..)?;
            }
        }
    }

    for array in collection.iter() {
        let dims: Vec<&str> = array.dims().iter().map(String::as_str).collect();
        let mut var = file.add_variable::<f64>(array.name(), &dims)?;
        // reserved netCDF attributes (`_FillValue`, ...) are not carried over
        for (name, value) in array.attrs().iter().filter(|(k, _)| !k.starts_with('_')) {
            put_attr_var(&mut var, name, value)?;
        }
        let values: Vec<f64> = array.data().iter().copied().collect();
        var.put_values(&values, ..)?;
    }
    debug!(path = %path.display(), variables = collection.len(), "wrote collection");
    Ok(())
}

/// Reads every non-coordinate variable of the NetCDF file at `path`.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::Netcdf`] or
/// [`IoError::InvalidTime`].
pub fn read_collection(path: &Path) -> Result<ArrayCollection, IoError> {
    let file = netcdf_read::open_file(path)?;

    let mut coords: BTreeMap<String, Coordinate> = BTreeMap::new();
    for var in file.variables() {
        let name = var.name();
        let dims = var.dimensions();
        if dims.len() != 1 || dims[0].name() != name {
            continue;
        }
        let attrs = netcdf_read::collect_attrs(var.attributes());
        let mut values = var.get_values::<f64, _>(..)?;
        let coord = if let Some(labels) = attrs.get(LABELS_ATTR).and_then(AttrValue::as_str) {
            Coordinate::Labels(split_labels(labels, values.len()))
        } else {
            if let Some(units) = netcdf_read::time_units(&attrs) {
                values = netcdf_read::decode_time(&values, units)?;
            }
            Coordinate::Values(values)
        };
        coords.insert(name, coord);
    }

    let mut collection = ArrayCollection::new();
    collection.update_attrs(&netcdf_read::collect_attrs(file.attributes()));
    for var in file.variables() {
        let name = var.name();
        if coords.contains_key(&name) {
            continue;
        }
        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let values = var.get_values::<f64, _>(..)?;
        let mut array = LabeledArray::from_vec(&name, &dims, &shape, values)?;
        for dim in &dims {
            if let Some(c) = coords.get(dim) {
                array.set_coord(dim, c.clone())?;
            }
        }
        array.set_attrs(netcdf_read::collect_attrs(var.attributes()));
        collection.insert(array);
    }
    debug!(path = %path.display(), variables = collection.len(), "read collection");
    Ok(collection)
}

fn split_labels(joined: &str, len: usize) -> Vec<String> {
    if len == 0 {
        return Vec::new();
    }
    joined.split(LABEL_SEPARATOR).map(str::to_string).collect()
}

fn put_attr_file(file: &mut netcdf::FileMut, name: &str, value: &AttrValue) -> Result<(), IoError> {
    match value {
        AttrValue::Str(s) => file.add_attribute(name, s.as_str())?,
        AttrValue::Num(v) => file.add_attribute(name, *v)?,
        AttrValue::Nums(v) => file.add_attribute(name, v.clone())?,
    };
    Ok(())
}

fn put_attr_var(var: &mut netcdf::VariableMut<'_>, name: &str, value: &AttrValue) -> Result<(), IoError> {
    match value {
        AttrValue::Str(s) => var.put_attribute(name, s.as_str())?,
        AttrValue::Num(v) => var.put_attribute(name, *v)?,
        AttrValue::Nums(v) => var.put_attribute(name, v.clone())?,
    };
    Ok(())
}
