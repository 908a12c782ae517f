//! Reading raw source variables from reanalysis NetCDF files.

use std::path::{Path, PathBuf};

use fmprep_array::{Attrs, LabeledArray};
use tracing::debug;

use crate::error::IoError;
use crate::netcdf_read;

/// An open raw source file.
///
/// Variables are read with their native dimension names; renaming to the
/// canonical axes happens downstream. Coordinate variables (1-D variables
/// named after their dimension) become axis coordinates, and CF time
/// coordinates are decoded to seconds since the Unix epoch.
pub struct SourceFile {
    file: netcdf::File,
    path: PathBuf,
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile").field("path", &self.path).finish()
    }
}

impl SourceFile {
    /// Opens `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] or [`IoError::Netcdf`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref().to_path_buf();
        let file = netcdf_read::open_file(&path)?;
        debug!(path = %path.display(), "opened source file");
        Ok(Self { file, path })
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all variables, including coordinate variables.
    pub fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name()).collect()
    }

    /// Returns `true` if the file has a variable called `name`.
    pub fn has_variable(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    /// Global attributes.
    pub fn global_attrs(&self) -> Attrs {
        netcdf_read::collect_attrs(self.file.attributes())
    }

    /// Reads one variable as a [`LabeledArray`].
    ///
    /// `_FillValue` cells become NaN and packed values are unpacked; the
    /// corresponding attributes are removed. Other attributes, including any
    /// `missing_value` sentinel, are kept.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingVariable`], [`IoError::Netcdf`] or
    /// [`IoError::InvalidTime`] for undecodable time coordinates.
    pub fn read_variable(&self, name: &str) -> Result<LabeledArray, IoError> {
        let var = self
            .file
            .variable(name)
            .ok_or_else(|| IoError::MissingVariable {
                name: name.to_string(),
                path: self.path.clone(),
            })?;

        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let mut attrs = netcdf_read::collect_attrs(var.attributes());
        let mut values = var.get_values::<f64, _>(..)?;
        netcdf_read::decode_values(&mut values, &mut attrs);

        let mut array = LabeledArray::from_vec(name, &dims, &shape, values)?;
        for dim in &dims {
            if dim == name {
                continue;
            }
            if let Some(coord) = self.read_coordinate(dim)? {
                array.set_coord(dim, coord)?;
            }
        }
        array.set_attrs(attrs);
        debug!(variable = name, dims = ?dims, shape = ?shape, "read source variable");
        Ok(array)
    }

    /// Reads the coordinate variable for `dim`, if the file has one.
    fn read_coordinate(&self, dim: &str) -> Result<Option<Vec<f64>>, IoError> {
        let Some(var) = self.file.variable(dim) else {
            return Ok(None);
        };
        if var.dimensions().len() != 1 {
            return Ok(None);
        }
        let attrs = netcdf_read::collect_attrs(var.attributes());
        let mut values = var.get_values::<f64, _>(..)?;
        if let Some(units) = netcdf_read::time_units(&attrs) {
            values = netcdf_read::decode_time(&values, units)?;
        }
        Ok(Some(values))
    }
}
