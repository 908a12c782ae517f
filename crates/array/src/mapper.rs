//! Coordinate and variable renaming.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::array::LabeledArray;
use crate::collection::ArrayCollection;
use crate::error::ArrayError;

/// A rename table from source names to target names.
///
/// Entries naming axes or variables that are absent are skipped silently.
///
/// # Example
///
/// ```
/// use fmprep_array::{CoordinateMapper, LabeledArray};
///
/// let mapper = CoordinateMapper::from_pairs([("lat", "y"), ("lon", "x")]);
/// let raw = LabeledArray::from_vec("T", &["lat", "lon"], &[1, 2], vec![1.0, 2.0]).unwrap();
/// let out = mapper.apply(raw).unwrap();
/// assert_eq!(out.dims(), &["y", "x"]);
/// assert_eq!(mapper.inverse().get("y"), Some("lat"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinateMapper {
    table: BTreeMap<String, String>,
}

impl CoordinateMapper {
    /// Creates a mapper from an explicit table.
    pub fn new(table: BTreeMap<String, String>) -> Self {
        Self { table }
    }

    /// Creates a mapper from `(old, new)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            table: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Target name for `old`.
    pub fn get(&self, old: &str) -> Option<&str> {
        self.table.get(old).map(String::as_str)
    }

    /// Maps `name`, returning it unchanged when not in the table.
    pub fn map_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).unwrap_or(name)
    }

    /// The underlying table.
    pub fn table(&self) -> &BTreeMap<String, String> {
        &self.table
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The reverse mapping (new → old).
    pub fn inverse(&self) -> Self {
        Self {
            table: self
                .table
                .iter()
                .map(|(k, v)| (v.clone(), k.clone()))
                .collect(),
        }
    }

    /// Keeps only entries whose source name satisfies `present`.
    pub fn restricted_to(&self, present: impl Fn(&str) -> bool) -> Self {
        Self {
            table: self
                .table
                .iter()
                .filter(|(k, _)| present(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Renames the axes and coordinates of one array.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::DuplicateDim`] if two axes would share a name.
    pub fn apply(&self, array: LabeledArray) -> Result<LabeledArray, ArrayError> {
        array.rename_dims(&self.table)
    }

    /// Renames axes of every variable in a collection.
    ///
    /// # Errors
    ///
    /// See [`CoordinateMapper::apply`].
    pub fn apply_collection(&self, collection: ArrayCollection) -> Result<ArrayCollection, ArrayError> {
        let attrs = collection.attrs().clone();
        let mut out = ArrayCollection::new();
        out.update_attrs(&attrs);
        for array in collection {
            out.insert(self.apply(array)?);
        }
        Ok(out)
    }

    /// Renames the variables of a collection; axes are left untouched.
    pub fn rename_variables(&self, collection: ArrayCollection) -> ArrayCollection {
        let attrs = collection.attrs().clone();
        let mut out = ArrayCollection::new();
        out.update_attrs(&attrs);
        for mut array in collection {
            if let Some(new) = self.get(array.name()) {
                array.set_name(new);
            }
            out.insert(array);
        }
        out
    }
}
