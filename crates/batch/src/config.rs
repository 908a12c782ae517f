//! Task-facing configuration of the batch assembler.

use std::collections::{BTreeMap, BTreeSet};

use fmprep_array::{CANONICAL_ORDER, CoordinateMapper, T, X, Z};
use fmprep_calendar::Granularity;

use crate::error::BatchError;

/// Which cached variables a model consumes and under which names.
///
/// `input_variables` maps model names to source (cache) names; `coords`
/// maps canonical axes (`t`, `z`, `y`, `x`) to model coordinate names.
///
/// # Example
///
/// ```
/// use fmprep_array::CoordinateMapper;
/// use fmprep_batch::TaskConfig;
///
/// let task = TaskConfig::new()
///     .with_collections(["slv"])
///     .with_input_variables([("2m_temperature", "T2M")])
///     .with_coords(CoordinateMapper::from_pairs([("t", "time"), ("x", "lon"), ("y", "lat")]));
/// assert!(task.validate().is_ok());
/// assert_eq!(task.model_name("T2M"), Some("2m_temperature"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskConfig {
    collections: Vec<String>,
    input_variables: BTreeMap<String, String>,
    coords: CoordinateMapper,
    levels: Option<Vec<f64>>,
    constants: BTreeSet<String>,
    granularity: Granularity,
}

impl TaskConfig {
    /// Creates an empty task at monthly granularity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cache collections to read.
    pub fn with_collections<I, S>(mut self, collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collections = collections.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the model → source variable names.
    pub fn with_input_variables<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.input_variables = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Sets the canonical → model coordinate names.
    pub fn with_coords(mut self, coords: CoordinateMapper) -> Self {
        self.coords = coords;
        self
    }

    /// Sets the vertical levels to select.
    pub fn with_levels(mut self, levels: Vec<f64>) -> Self {
        self.levels = Some(levels);
        self
    }

    /// Sets the model variables averaged over time on load.
    pub fn with_constants<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constants = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the cache granularity.
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    // --- Accessors ---

    /// Returns the collections.
    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    /// Returns the model → source variable table.
    pub fn input_variables(&self) -> &BTreeMap<String, String> {
        &self.input_variables
    }

    /// Returns the canonical → model coordinate table.
    pub fn coords(&self) -> &CoordinateMapper {
        &self.coords
    }

    /// Returns the selected levels.
    pub fn levels(&self) -> Option<&[f64]> {
        self.levels.as_deref()
    }

    /// Returns the granularity.
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Returns `true` if the model variable is averaged over time on load.
    pub fn is_constant(&self, model_name: &str) -> bool {
        self.constants.contains(model_name)
    }

    /// Source → model variable table.
    pub fn variable_mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.input_variables.clone()).inverse()
    }

    /// Model name of the source variable `source`, if the task uses it.
    pub fn model_name(&self, source: &str) -> Option<&str> {
        self.input_variables
            .iter()
            .find(|(_, s)| s.as_str() == source)
            .map(|(m, _)| m.as_str())
    }

    /// Model name of canonical axis `axis`.
    pub fn dim(&self, axis: &'static str) -> &str {
        self.coords.map_name(axis)
    }

    /// Model name of the time axis.
    pub fn time_dim(&self) -> &str {
        self.dim(T)
    }

    /// Model name of the vertical axis.
    pub fn level_dim(&self) -> &str {
        self.dim(Z)
    }

    /// Model name of the longitude axis.
    pub fn lon_dim(&self) -> &str {
        self.dim(X)
    }

    /// Model names of the canonical axes in canonical order.
    pub fn canonical_dims(&self) -> Vec<&str> {
        CANONICAL_ORDER.into_iter().map(|a| self.coords.map_name(a)).collect()
    }

    /// Validates the task.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidConfig`] if no collection or variable is
    /// configured, two model variables share a source, two axes share a
    /// model name, a constant is not a configured variable, or a level is
    /// not finite.
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.collections.is_empty() {
            return Err(invalid("at least one collection is required"));
        }
        if self.input_variables.is_empty() {
            return Err(invalid("at least one input variable is required"));
        }
        let sources: BTreeSet<&str> = self.input_variables.values().map(String::as_str).collect();
        if sources.len() != self.input_variables.len() {
            return Err(invalid("two model variables map to the same source variable"));
        }
        let dims: BTreeSet<&str> = self.canonical_dims().into_iter().collect();
        if dims.len() != CANONICAL_ORDER.len() {
            return Err(invalid("two canonical axes map to the same model coordinate"));
        }
        if let Some(c) = self.constants.iter().find(|c| !self.input_variables.contains_key(*c)) {
            return Err(invalid(format!("constant '{c}' is not an input variable")));
        }
        if let Some(levels) = &self.levels
            && levels.iter().any(|l| !l.is_finite())
        {
            return Err(invalid("levels must be finite"));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> BatchError {
    BatchError::InvalidConfig {
        reason: reason.into(),
    }
}
