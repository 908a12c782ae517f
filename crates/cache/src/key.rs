//! Cache unit keys and path-component validation.

use std::fmt;

use fmprep_calendar::TimePeriod;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Directory holding the statistics files of a version.
pub const STATS_DIR: &str = "stats";

/// Identifies one cache file within a version: an optional collection and
/// the time period it covers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitKey {
    collection: Option<String>,
    period: TimePeriod,
}

impl UnitKey {
    /// A key without a collection.
    pub fn new(period: TimePeriod) -> Self {
        Self {
            collection: None,
            period,
        }
    }

    /// Sets the collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// The collection, if any.
    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// The time period.
    pub fn period(&self) -> TimePeriod {
        self.period
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.collection {
            Some(c) => write!(f, "{c}/{}", self.period),
            None => write!(f, "{}", self.period),
        }
    }
}

/// Checks that `name` is usable as a single path component.
pub(crate) fn validate_component(what: &'static str, name: &str) -> Result<(), CacheError> {
    let reject = |reason| {
        Err(CacheError::InvalidName {
            what,
            name: name.to_string(),
            reason,
        })
    };
    if name.is_empty() {
        return reject("must not be empty");
    }
    if name.contains(['/', '\\']) {
        return reject("must not contain path separators");
    }
    if name.starts_with('.') {
        return reject("must not start with '.'");
    }
    Ok(())
}

/// Checks a collection name; `stats` is reserved.
pub(crate) fn validate_collection(name: &str) -> Result<(), CacheError> {
    validate_component("collection", name)?;
    if name == STATS_DIR {
        return Err(CacheError::InvalidName {
            what: "collection",
            name: name.to_string(),
            reason: "reserved for statistics files",
        });
    }
    Ok(())
}
