//! Description of one unit of work.

use std::path::PathBuf;

use fmprep_array::{AttrValue, Attrs};
use fmprep_cache::UnitKey;
use fmprep_regrid::MONTH_ATTR;

/// One collection over one period: the raw files to read and the variables
/// to extract from them.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTask {
    key: UnitKey,
    files: Vec<PathBuf>,
    variables: Vec<String>,
    constant: bool,
}

impl UnitTask {
    /// Creates a task for `key` reading `variables` from `files`.
    ///
    /// Files are processed in sorted order regardless of input order.
    pub fn new<I, S>(key: UnitKey, files: Vec<PathBuf>, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut files = files;
        files.sort();
        Self {
            key,
            files,
            variables: variables.into_iter().map(Into::into).collect(),
            constant: false,
        }
    }

    /// Marks the collection as time-invariant: only the first time step of
    /// each variable is kept.
    pub fn with_constant(mut self, constant: bool) -> Self {
        self.constant = constant;
        self
    }

    /// Returns the cache key.
    pub fn key(&self) -> &UnitKey {
        &self.key
    }

    /// Returns the raw files in processing order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Returns the variables to extract.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Returns `true` for time-invariant collections.
    pub fn is_constant(&self) -> bool {
        self.constant
    }

    /// Provenance keys recorded on every variable of the unit.
    pub fn processing_attrs(&self, version: &str) -> Attrs {
        let period = self.key.period();
        let mut attrs = Attrs::new();
        attrs.insert("version".to_string(), AttrValue::from(version));
        attrs.insert("year".to_string(), AttrValue::from(period.year_value()));
        if let Some(m) = period.month_value() {
            attrs.insert(MONTH_ATTR.to_string(), AttrValue::from(m));
        }
        if let Some(d) = period.day_value() {
            attrs.insert("day".to_string(), AttrValue::from(d));
        }
        attrs
    }
}
