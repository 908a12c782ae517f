//! Streaming, mergeable normalization statistics.

use std::collections::BTreeMap;

use fmprep_array::{ArrayCollection, LabeledArray, T, X, Y};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StatsError;
use crate::moments::{nan_mean, nan_std, weighted_mean, weighted_rms};
use crate::name::StatName;

/// Axes reduced when summarising one observation.
const REDUCED_DIMS: [&str; 3] = [T, Y, X];

/// One partial statistic and the number of time steps it summarises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Weight, at least 1.
    pub weight: usize,
    /// The partial statistic.
    pub value: LabeledArray,
}

/// Partial observations of one variable, keyed by statistic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsEntry {
    observations: BTreeMap<StatName, Vec<Observation>>,
}

impl StatsEntry {
    /// Observations recorded for `stat`.
    pub fn observations(&self, stat: StatName) -> &[Observation] {
        self.observations.get(&stat).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.observations.values().all(Vec::is_empty)
    }

    fn push(&mut self, stat: StatName, weight: usize, value: LabeledArray) {
        self.observations
            .entry(stat)
            .or_default()
            .push(Observation { weight, value });
    }

    fn extend(&mut self, other: StatsEntry) {
        for (stat, obs) in other.observations {
            self.observations.entry(stat).or_default().extend(obs);
        }
    }
}

/// Variable name → [`StatsEntry`].
///
/// Each worker builds its own accumulator; the coordinator folds them with
/// [`StatsAccumulator::merge`] and pools with [`StatsAccumulator::accumulate`].
///
/// # Example
///
/// ```
/// use fmprep_array::LabeledArray;
/// use fmprep_stats::{StatName, StatsAccumulator};
///
/// let mut acc = StatsAccumulator::new();
/// let arr = LabeledArray::from_vec("T", &["t", "x"], &[2, 1], vec![1.0, 3.0]).unwrap();
/// acc.add_entry("T", &arr).unwrap();
/// let means = acc.accumulate(StatName::Mean).unwrap();
/// assert_eq!(means.get("T").unwrap().data().iter().next().copied(), Some(2.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsAccumulator {
    entries: BTreeMap<String, StatsEntry>,
}

impl StatsAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `varname`.
    pub fn entry(&self, varname: &str) -> Option<&StatsEntry> {
        self.entries.get(varname)
    }

    /// Variable names with recorded observations.
    pub fn variables(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Returns `true` if no variable has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(StatsEntry::is_empty)
    }

    /// Records the statistics of one processed array.
    ///
    /// Arrays without a time axis are recorded only for the first observation
    /// of `varname`, so constant fields repeated in every unit count once.
    /// Mean and std are reduced over the `t`, `y` and `x` axes present; any
    /// other axis is kept. Arrays with at least two time steps also record the
    /// statistics of their first time difference.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Array`] if a reduction fails.
    pub fn add_entry(&mut self, varname: &str, array: &LabeledArray) -> Result<(), StatsError> {
        let time_len = array.len_of(T);
        if time_len.is_none() && self.entries.contains_key(varname) {
            return Ok(());
        }
        let weight = time_len.unwrap_or(1).max(1);

        let entry = self.entries.entry(varname.to_string()).or_default();
        entry.push(StatName::Mean, weight, array.reduce(&REDUCED_DIMS, nan_mean)?);
        entry.push(StatName::Std, weight, array.reduce(&REDUCED_DIMS, nan_std)?);

        if let Some(n) = time_len
            && n >= 2
        {
            let diff = array.diff(T)?;
            entry.push(StatName::MeanDiff, weight, diff.reduce(&REDUCED_DIMS, nan_mean)?);
            entry.push(StatName::StdDiff, weight, diff.reduce(&REDUCED_DIMS, nan_std)?);
        }
        debug!(variable = varname, weight, "recorded statistics");
        Ok(())
    }

    /// Appends every partial observation of `other`.
    pub fn merge(&mut self, other: StatsAccumulator) {
        for (name, entry) in other.entries {
            self.entries.entry(name).or_default().extend(entry);
        }
    }

    /// Builder form of [`StatsAccumulator::merge`].
    pub fn merged(mut self, other: StatsAccumulator) -> Self {
        self.merge(other);
        self
    }

    /// Pools the partial observations of `stat` for every variable.
    ///
    /// Mean statistics pool as `Σ(w·v)/Σw`, std statistics as
    /// `√(Σ(w·v²)/Σw)`. Variables without observations of `stat` are absent
    /// from the result.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::IncompatibleObservations`] if partial shapes
    /// differ.
    pub fn accumulate(&self, stat: StatName) -> Result<ArrayCollection, StatsError> {
        let mut out = ArrayCollection::new();
        for (name, entry) in &self.entries {
            let obs = entry.observations(stat);
            let Some(first) = obs.first() else {
                continue;
            };
            let shape = first.value.shape();
            for o in obs {
                if o.value.shape() != shape || o.value.dims() != first.value.dims() {
                    return Err(StatsError::IncompatibleObservations {
                        variable: name.clone(),
                        stat: stat.to_string(),
                        reason: format!("shape {:?} vs {:?}", o.value.shape(), shape),
                    });
                }
            }
            let weights: Vec<f64> = obs.iter().map(|o| o.weight as f64).collect();
            let pool: fn(&[f64], &[f64]) -> f64 = if stat.is_squared() {
                weighted_rms
            } else {
                weighted_mean
            };
            let mut values = Vec::with_capacity(obs.len());
            let num = ArrayD::from_shape_fn(first.value.data().raw_dim(), |idx| {
                values.clear();
                values.extend(obs.iter().map(|o| o.value.data()[&idx]));
                pool(&values, &weights)
            });
            let mut pooled = first.value.clone();
            *pooled.data_mut() = num;
            pooled.set_name(name.clone());
            pooled.set_attr("statistic", stat.as_str());
            out.insert(pooled);
        }
        Ok(out)
    }
}
