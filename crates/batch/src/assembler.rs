//! Loading cached units into model-facing batches.

use std::collections::BTreeMap;

use fmprep_array::{ArrayCollection, Coordinate, LabeledArray, T, Z, concat, stack_features};
use fmprep_cache::{CacheStore, UnitKey};
use fmprep_calendar::{Date, SECONDS_PER_DAY, TimePeriod, date_range};
use fmprep_stats::{StatName, nan_mean};
use tracing::{debug, info, warn};

use crate::config::TaskConfig;
use crate::derived::{find_coord, progress_features};
use crate::error::BatchError;

/// Name of the stacked feature tensor.
pub const FEATURES: &str = "features";

/// Persisted normalization statistics under model-facing names.
#[derive(Debug, Clone, PartialEq)]
pub struct NormData {
    /// Pooled mean per variable.
    pub mean: ArrayCollection,
    /// Pooled standard deviation per variable.
    pub std: ArrayCollection,
    /// Pooled standard deviation of the first time difference.
    pub std_diff: ArrayCollection,
}

/// Reads cached units of one version and shapes them for a task.
#[derive(Debug, Clone)]
pub struct BatchAssembler {
    store: CacheStore,
    version: String,
    task: TaskConfig,
}

impl BatchAssembler {
    /// Creates an assembler.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidConfig`] if `task` fails validation.
    pub fn new(store: CacheStore, version: impl Into<String>, task: TaskConfig) -> Result<Self, BatchError> {
        task.validate()?;
        Ok(Self {
            store,
            version: version.into(),
            task,
        })
    }

    /// Returns the task.
    pub fn task(&self) -> &TaskConfig {
        &self.task
    }

    /// Loads the task variables for one day.
    ///
    /// Each configured collection's unit containing `date` is read, its time
    /// steps restricted to that day, and the variables renamed to model
    /// names. Task variables found in no collection are skipped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Cache`] if a unit file is missing or unreadable,
    /// and [`BatchError::NoTimesteps`] if a time-varying variable has no steps
    /// on `date`.
    pub fn load_timestep(&self, date: Date) -> Result<ArrayCollection, BatchError> {
        let units = self.read_units(self.period_of(date))?;
        self.slice_day(date, &units)
    }

    /// Loads every day in `[start, end]` and merges the slices.
    ///
    /// # Errors
    ///
    /// See [`BatchAssembler::load_timestep`] and
    /// [`BatchAssembler::merge_batch`].
    pub fn load_batch(&self, start: Date, end: Date) -> Result<ArrayCollection, BatchError> {
        let dates = date_range(start, end)?;
        let mut slices = Vec::with_capacity(dates.len());
        let mut loaded: Option<(TimePeriod, BTreeMap<String, ArrayCollection>)> = None;
        for date in dates {
            let period = self.period_of(date);
            let units = match loaded.take() {
                Some((p, units)) if p == period => units,
                _ => self.read_units(period)?,
            };
            slices.push(self.slice_day(date, &units)?);
            loaded = Some((period, units));
        }
        info!(start = %start, end = %end, days = slices.len(), "loaded batch");
        self.merge_batch(&slices)
    }

    /// Concatenates time-varying variables along time.
    ///
    /// Variables without the time axis are taken once from the first slice.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::EmptyBatch`] for no slices,
    /// [`BatchError::MissingVariable`] if a later slice lacks a time-varying
    /// variable of the first, or [`BatchError::Array`] on shape mismatch.
    pub fn merge_batch(&self, slices: &[ArrayCollection]) -> Result<ArrayCollection, BatchError> {
        let first = slices.first().ok_or(BatchError::EmptyBatch {
            reason: "no slices to merge",
        })?;
        let tdim = self.task.time_dim();

        let mut out = ArrayCollection::new();
        out.update_attrs(first.attrs());
        for array in first.iter() {
            if !array.has_dim(tdim) {
                out.insert(array.clone());
                continue;
            }
            let parts = slices
                .iter()
                .enumerate()
                .map(|(index, slice)| {
                    slice
                        .get(array.name())
                        .cloned()
                        .ok_or_else(|| BatchError::MissingVariable {
                            name: array.name().to_string(),
                            index,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            out.insert(concat(&parts, tdim)?);
        }
        Ok(out)
    }

    /// Stacks every variable into one tensor with a trailing `feature` axis.
    ///
    /// A variable with a level axis contributes one feature per level,
    /// labelled `{name}.{level}`; others contribute one feature labelled by
    /// name. Features are broadcast to the union of the remaining axes.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::EmptyBatch`] for an empty collection, or
    /// [`BatchError::Array`] if features disagree on a shared axis length.
    pub fn to_feature_array(&self, collection: &ArrayCollection) -> Result<LabeledArray, BatchError> {
        let zdim = self.task.level_dim();
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for array in collection.iter() {
            let Some(nlev) = array.len_of(zdim) else {
                labels.push(array.name().to_string());
                features.push(array.clone());
                continue;
            };
            let levels: Vec<f64> = match array.coord_values(zdim) {
                Some(values) => values.to_vec(),
                None => (0..nlev).map(|i| i as f64).collect(),
            };
            for (i, level) in levels.iter().enumerate() {
                let mut feature = array.isel(zdim, i)?;
                let label = format!("{}.{level}", array.name());
                feature.set_name(label.clone());
                labels.push(label);
                features.push(feature);
            }
        }
        if features.is_empty() {
            return Err(BatchError::EmptyBatch {
                reason: "no variables to stack",
            });
        }

        let (dims, shape, coords) = self.union_axes(&features);
        let broadcast = features
            .iter()
            .map(|f| f.broadcast_to(&dims, &shape, &coords))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(features = labels.len(), dims = ?dims, "stacked feature array");
        Ok(stack_features(FEATURES, &broadcast, labels)?)
    }

    /// Adds the year- and day-progress features.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::MissingCoordinate`] when no variable carries the
    /// time or longitude coordinate.
    pub fn add_derived_vars(&self, mut collection: ArrayCollection) -> Result<ArrayCollection, BatchError> {
        let tdim = self.task.time_dim();
        let xdim = self.task.lon_dim();
        let times = find_coord(&collection, tdim)
            .ok_or_else(|| BatchError::MissingCoordinate {
                name: tdim.to_string(),
                purpose: "year and day progress",
            })?
            .to_vec();
        let lons = find_coord(&collection, xdim)
            .ok_or_else(|| BatchError::MissingCoordinate {
                name: xdim.to_string(),
                purpose: "day progress",
            })?
            .to_vec();
        for feature in progress_features(tdim, &times, xdim, &lons)? {
            collection.insert(feature);
        }
        Ok(collection)
    }

    /// Loads the persisted `mean`, `std` and `std_diff` statistics of the
    /// task variables under model names.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Cache`] if a statistics file is missing.
    pub fn load_norm_data(&self) -> Result<NormData, BatchError> {
        Ok(NormData {
            mean: self.load_stat(StatName::Mean)?,
            std: self.load_stat(StatName::Std)?,
            std_diff: self.load_stat(StatName::StdDiff)?,
        })
    }

    fn load_stat(&self, stat: StatName) -> Result<ArrayCollection, BatchError> {
        let stats = self.store.read_stats(&self.version, stat)?;
        let mut out = ArrayCollection::new();
        out.update_attrs(stats.attrs());
        for (model, source) in self.task.input_variables() {
            match stats.get(source) {
                Some(array) => out.insert(self.to_model(model, array.clone())?),
                None => warn!(variable = %source, stat = %stat, "no statistics for variable"),
            }
        }
        Ok(out)
    }

    fn period_of(&self, date: Date) -> TimePeriod {
        TimePeriod::containing(date, self.task.granularity())
    }

    fn read_units(&self, period: TimePeriod) -> Result<BTreeMap<String, ArrayCollection>, BatchError> {
        self.task
            .collections()
            .iter()
            .map(|c| {
                let key = UnitKey::new(period).with_collection(c.clone());
                Ok::<_, BatchError>((c.clone(), self.store.read_unit(&self.version, &key)?))
            })
            .collect()
    }

    fn slice_day(
        &self,
        date: Date,
        units: &BTreeMap<String, ArrayCollection>,
    ) -> Result<ArrayCollection, BatchError> {
        let start = date.epoch_seconds() as f64;
        let end = start + SECONDS_PER_DAY as f64;

        let mut out = ArrayCollection::new();
        for (collection, unit) in units {
            out.update_attrs(unit.attrs());
            for (model, source) in self.task.input_variables() {
                let Some(array) = unit.get(source) else {
                    continue;
                };
                let mut array = array.clone();
                if array.has_dim(T) {
                    array = array.select_where(T, |s| s >= start && s < end)?;
                    if array.len_of(T) == Some(0) {
                        return Err(BatchError::NoTimesteps {
                            variable: source.clone(),
                            collection: collection.clone(),
                            date: date.to_string(),
                        });
                    }
                    if self.task.is_constant(model) {
                        array = array.reduce(&[T], nan_mean)?;
                    }
                }
                out.insert(self.to_model(model, array)?);
            }
        }
        for (model, source) in self.task.input_variables() {
            if !out.contains(model) {
                warn!(variable = %source, date = %date, "task variable not found in any collection");
            }
        }
        debug!(date = %date, variables = out.len(), "loaded timestep");
        Ok(out)
    }

    /// Selects the task levels, then renames to model names.
    fn to_model(&self, model: &str, mut array: LabeledArray) -> Result<LabeledArray, BatchError> {
        if let Some(levels) = self.task.levels()
            && array.has_dim(Z)
        {
            let indices = levels
                .iter()
                .map(|&l| array.nearest_index(Z, l))
                .collect::<Result<Vec<_>, _>>()?;
            array = array.select_indices(Z, &indices)?;
            array.set_coord(Z, levels.to_vec())?;
        }
        array.set_name(model);
        Ok(self.task.coords().apply(array)?)
    }

    /// Union of the features' axes in canonical model order.
    fn union_axes(&self, features: &[LabeledArray]) -> (Vec<String>, Vec<usize>, BTreeMap<String, Coordinate>) {
        let mut axes: Vec<(String, usize)> = Vec::new();
        let mut coords = BTreeMap::new();
        for f in features {
            for (d, &len) in f.dims().iter().zip(f.shape()) {
                if axes.iter().any(|(name, _)| name == d) {
                    continue;
                }
                axes.push((d.clone(), len));
                if let Some(c) = f.coord(d) {
                    coords.insert(d.clone(), c.clone());
                }
            }
        }
        let order = self.task.canonical_dims();
        axes.sort_by_key(|(d, _)| order.iter().position(|o| *o == d.as_str()).unwrap_or(order.len()));
        let (dims, shape) = axes.into_iter().unzip();
        (dims, shape, coords)
    }
}
