//! Processing of a single unit: read, resample, cache, record statistics.

use fmprep_array::{ArrayCollection, AttrValue, Attrs, LabeledArray, T, concat};
use fmprep_cache::{CacheStore, UnitKey, UnitOutcome};
use fmprep_io::SourceFile;
use fmprep_regrid::{GridConfig, Resampler, TargetCoords};
use fmprep_stats::StatsAccumulator;
use tracing::{debug, info, warn};

use crate::error::PreprocessError;
use crate::unit::UnitTask;

/// What one worker hands back to the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitReport {
    /// The processed unit.
    pub key: UnitKey,
    /// Cache outcome.
    pub outcome: UnitOutcome,
    /// Statistics of the unit's variables, from the fresh result or, when
    /// skipped, from the cached file.
    pub stats: StatsAccumulator,
}

/// Runs the resampling pipeline for units of one cache version.
#[derive(Debug, Clone)]
pub struct UnitProcessor {
    resampler: Resampler,
    store: CacheStore,
    version: String,
    reprocess: bool,
}

impl UnitProcessor {
    /// Creates a processor writing to `store` under `version`.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessError::Regrid`] if `grid` fails validation.
    pub fn new(store: CacheStore, version: impl Into<String>, grid: GridConfig) -> Result<Self, PreprocessError> {
        Ok(Self {
            resampler: Resampler::new(grid)?,
            store,
            version: version.into(),
            reprocess: false,
        })
    }

    /// Forces recomputation of units whose cache file exists.
    pub fn with_reprocess(mut self, reprocess: bool) -> Self {
        self.reprocess = reprocess;
        self
    }

    /// Returns the cache store.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Returns the cache version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Processes one unit with skip-if-exists semantics.
    ///
    /// # Errors
    ///
    /// Returns the first read, resampling, gap-filling or write error of the
    /// unit. No file is left behind on error.
    pub fn process(&self, task: &UnitTask) -> Result<UnitReport, PreprocessError> {
        let mut stats = StatsAccumulator::new();
        let outcome = self
            .store
            .process_unit(&self.version, task.key(), self.reprocess, || {
                let (collection, fresh) = self.compute(task)?;
                stats = fresh;
                Ok::<_, PreprocessError>(collection)
            })?;

        if let UnitOutcome::Skipped(_) = outcome {
            let cached = self.store.read_unit(&self.version, task.key())?;
            for array in cached.iter() {
                if task.variables().iter().any(|v| v == array.name()) {
                    stats.add_entry(array.name(), array)?;
                }
            }
        }
        Ok(UnitReport {
            key: task.key().clone(),
            outcome,
            stats,
        })
    }

    /// Reads and resamples every variable of `task` without touching the
    /// cache.
    ///
    /// Variables absent from a file are skipped with a warning. Per-file
    /// results are concatenated along time.
    ///
    /// # Errors
    ///
    /// See [`UnitProcessor::process`].
    pub fn compute(&self, task: &UnitTask) -> Result<(ArrayCollection, StatsAccumulator), PreprocessError> {
        let unit = task.key().to_string();
        if task.variables().is_empty() {
            return Err(PreprocessError::InvalidUnit {
                unit,
                reason: "no variables configured".to_string(),
            });
        }
        let mut out = ArrayCollection::new();
        let mut stats = StatsAccumulator::new();
        if task.files().is_empty() {
            warn!(unit = %unit, "no source files");
            return Ok((out, stats));
        }

        let sources = task
            .files()
            .iter()
            .map(SourceFile::open)
            .collect::<Result<Vec<_>, _>>()?;
        let Some(targets) = self.resolve_targets(task, &sources)? else {
            warn!(unit = %unit, "no configured variable in any source file");
            return Ok((out, stats));
        };

        let mut file_attrs: Vec<Attrs> = Vec::with_capacity(sources.len());
        for source in &sources {
            let mut attrs = Attrs::new();
            if let Some(c) = task.key().collection() {
                attrs.insert("collection".to_string(), AttrValue::from(c));
            }
            attrs.extend(source.global_attrs());
            attrs.extend(task.processing_attrs(&self.version));
            file_attrs.push(attrs);
        }

        for var in task.variables() {
            let mut samples: Vec<LabeledArray> = Vec::with_capacity(sources.len());
            for (source, attrs) in sources.iter().zip(&file_attrs) {
                if !source.has_variable(var) {
                    warn!(variable = %var, path = %source.path().display(), "variable missing from source file");
                    continue;
                }
                let raw = source.read_variable(var)?;
                let quantity = self.resampler.config().quantity_type(var);
                samples.push(
                    self.resampler
                        .subsample(raw, attrs, quantity, task.is_constant(), &targets)?,
                );
            }
            let Some(merged) = merge_samples(samples)? else {
                warn!(variable = %var, unit = %unit, "variable found in no source file");
                continue;
            };
            stats.add_entry(var, &merged)?;
            out.insert(merged);
        }

        if let Some(first) = file_attrs.first() {
            out.update_attrs(first);
        }
        info!(unit = %unit, files = sources.len(), variables = out.len(), "computed unit");
        Ok((out, stats))
    }

    /// Target coordinates of the unit, from the first configured variable
    /// found in the first file that has one.
    fn resolve_targets(
        &self,
        task: &UnitTask,
        sources: &[SourceFile],
    ) -> Result<Option<TargetCoords>, PreprocessError> {
        for source in sources {
            if let Some(var) = task.variables().iter().find(|v| source.has_variable(v)) {
                let raw = source.read_variable(var)?;
                let targets = self.resampler.resolve_targets(&raw)?;
                debug!(unit = %task.key(), variable = %var, targets = ?targets, "resolved target coordinates");
                return Ok(Some(targets));
            }
        }
        Ok(None)
    }
}

/// Concatenates per-file samples along time; a single sample, or samples
/// without a time axis, yield the first.
fn merge_samples(mut samples: Vec<LabeledArray>) -> Result<Option<LabeledArray>, PreprocessError> {
    match samples.len() {
        0 => Ok(None),
        1 => Ok(samples.pop()),
        _ if samples[0].has_dim(T) => Ok(Some(concat(&samples, T)?)),
        _ => Ok(Some(samples.swap_remove(0))),
    }
}
