//! # fmprep-io
//!
//! Read raw reanalysis variables from NetCDF source files and read/write
//! processed [`ArrayCollection`](fmprep_array::ArrayCollection)s as NetCDF
//! cache files. Bridges the file format into fmprep's labeled-array model.

mod collection;
mod error;
mod netcdf_read;
mod source;

pub use collection::{LABEL_SEPARATOR, TIME_UNITS, read_collection, write_collection};
pub use error::IoError;
pub use source::SourceFile;
