//! Named arrays sharing collection-level attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::array::LabeledArray;
use crate::attrs::{AttrValue, Attrs};

/// The in-memory form of one NetCDF file: variables keyed by name plus
/// global attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayCollection {
    variables: BTreeMap<String, LabeledArray>,
    attrs: Attrs,
}

impl ArrayCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a variable under its own name, replacing any previous one.
    pub fn insert(&mut self, array: LabeledArray) {
        self.variables.insert(array.name().to_string(), array);
    }

    /// Builder form of [`ArrayCollection::insert`].
    pub fn with(mut self, array: LabeledArray) -> Self {
        self.insert(array);
        self
    }

    /// Variable lookup.
    pub fn get(&self, name: &str) -> Option<&LabeledArray> {
        self.variables.get(name)
    }

    /// Removes a variable, returning it.
    pub fn remove(&mut self, name: &str) -> Option<LabeledArray> {
        self.variables.remove(name)
    }

    /// Returns `true` if a variable called `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Variable names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.variables.keys().map(String::as_str).collect()
    }

    /// Iterates variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = &LabeledArray> {
        self.variables.values()
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if there are no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Global attributes.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Sets one global attribute.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Merges global attributes, overriding existing keys.
    pub fn update_attrs(&mut self, attrs: &Attrs) {
        for (k, v) in attrs {
            self.attrs.insert(k.clone(), v.clone());
        }
    }

    /// Keeps only the variables for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&LabeledArray) -> bool) {
        self.variables.retain(|_, v| keep(v));
    }
}

impl IntoIterator for ArrayCollection {
    type Item = LabeledArray;
    type IntoIter = std::collections::btree_map::IntoValues<String, LabeledArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.into_values()
    }
}

impl FromIterator<LabeledArray> for ArrayCollection {
    fn from_iter<I: IntoIterator<Item = LabeledArray>>(iter: I) -> Self {
        let mut c = Self::new();
        for a in iter {
            c.insert(a);
        }
        c
    }
}
