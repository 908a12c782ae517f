//! Versioned on-disk store of processed units and statistics files.

use std::fs;
use std::path::{Path, PathBuf};

use fmprep_array::ArrayCollection;
use fmprep_calendar::TimePeriod;
use fmprep_io::{read_collection, write_collection};
use fmprep_stats::{StatName, StatsAccumulator};
use tracing::{debug, info};

use crate::error::CacheError;
use crate::key::{STATS_DIR, UnitKey, validate_collection, validate_component};

/// Extension of every cache file.
pub const CACHE_EXTENSION: &str = "nc";

/// Result of [`CacheStore::process_unit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// The unit was computed and written to this path.
    Written(PathBuf),
    /// A file already existed at this path; nothing was computed.
    Skipped(PathBuf),
    /// The computation produced no variables; nothing was written.
    Empty,
}

impl UnitOutcome {
    /// Path of the cache file, if one exists after processing.
    pub fn path(&self) -> Option<&Path> {
        match self {
            UnitOutcome::Written(p) | UnitOutcome::Skipped(p) => Some(p),
            UnitOutcome::Empty => None,
        }
    }
}

/// Root directory of the cache.
///
/// Layout:
///
/// ```text
/// {root}/{version}/{collection}/{period}.nc
/// {root}/{version}/{period}.nc              (no collection)
/// {root}/{version}/stats/{stat}.nc
/// ```
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// A store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic path of the cache file for `key` under `version`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidName`] if `version` or the key's
    /// collection is not a valid path component, or the collection is
    /// `stats`.
    pub fn cache_filepath(&self, version: &str, key: &UnitKey) -> Result<PathBuf, CacheError> {
        validate_component("version", version)?;
        let mut path = self.root.join(version);
        if let Some(collection) = key.collection() {
            validate_collection(collection)?;
            path.push(collection);
        }
        path.push(format!("{}.{CACHE_EXTENSION}", key.period().key()));
        Ok(path)
    }

    /// Path of the persisted statistic `stat` under `version`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidName`] if `version` is invalid.
    pub fn stats_filepath(&self, version: &str, stat: StatName) -> Result<PathBuf, CacheError> {
        validate_component("version", version)?;
        Ok(self
            .root
            .join(version)
            .join(STATS_DIR)
            .join(format!("{stat}.{CACHE_EXTENSION}")))
    }

    /// Returns `true` if a cache file exists for `key`.
    pub fn contains(&self, version: &str, key: &UnitKey) -> Result<bool, CacheError> {
        Ok(self.cache_filepath(version, key)?.is_file())
    }

    /// Processes one unit with skip-if-exists semantics.
    ///
    /// If the file for `key` exists and `reprocess` is false, `compute` is
    /// never called. Otherwise its result is written atomically; an empty
    /// result writes nothing.
    ///
    /// # Errors
    ///
    /// Propagates the error of `compute`, or a [`CacheError`] converted into
    /// `E` on a path or write failure.
    pub fn process_unit<F, E>(
        &self,
        version: &str,
        key: &UnitKey,
        reprocess: bool,
        compute: F,
    ) -> Result<UnitOutcome, E>
    where
        F: FnOnce() -> Result<ArrayCollection, E>,
        E: From<CacheError>,
    {
        let path = self.cache_filepath(version, key)?;
        if path.is_file() && !reprocess {
            debug!(unit = %key, path = %path.display(), "cache hit, skipping");
            return Ok(UnitOutcome::Skipped(path));
        }

        let collection = compute()?;
        if collection.is_empty() {
            info!(unit = %key, "no variables produced, nothing written");
            return Ok(UnitOutcome::Empty);
        }
        write_atomic(&path, &collection)?;
        info!(unit = %key, path = %path.display(), variables = collection.len(), "wrote unit");
        Ok(UnitOutcome::Written(path))
    }

    /// Reads the cache file for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Missing`] if no file exists, or
    /// [`CacheError::Io`] if it cannot be decoded.
    pub fn read_unit(&self, version: &str, key: &UnitKey) -> Result<ArrayCollection, CacheError> {
        let path = self.cache_filepath(version, key)?;
        read_existing(&path)
    }

    /// Lists the periods cached for `collection` (or at the version root
    /// when `None`), in chronological order.
    ///
    /// Files whose stem is not a period key are ignored. A missing directory
    /// yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidName`] or [`CacheError::FileSystem`].
    pub fn list_units(
        &self,
        version: &str,
        collection: Option<&str>,
    ) -> Result<Vec<UnitKey>, CacheError> {
        validate_component("version", version)?;
        let mut dir = self.root.join(version);
        if let Some(c) = collection {
            validate_collection(c)?;
            dir.push(c);
        }
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&dir).map_err(|e| CacheError::fs("read directory", &dir, e))?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::fs("read directory", &dir, e))?;
            let path = entry.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(CACHE_EXTENSION)
            {
                continue;
            }
            let Some(period) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<TimePeriod>().ok())
            else {
                continue;
            };
            let key = UnitKey::new(period);
            keys.push(match collection {
                Some(c) => key.with_collection(c),
                None => key,
            });
        }
        keys.sort();
        Ok(keys)
    }

    /// Pools `stats` and writes one file per persisted statistic.
    ///
    /// Returns the written paths in [`StatName::PERSISTED`] order.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Stats`] if pooling fails, or a write error.
    pub fn write_stats(
        &self,
        version: &str,
        stats: &StatsAccumulator,
    ) -> Result<Vec<PathBuf>, CacheError> {
        let mut written = Vec::with_capacity(StatName::PERSISTED.len());
        for stat in StatName::PERSISTED {
            let path = self.stats_filepath(version, stat)?;
            let mut pooled = stats.accumulate(stat)?;
            pooled.set_attr("statistic", stat.as_str());
            write_atomic(&path, &pooled)?;
            written.push(path);
        }
        info!(version, variables = stats.variables().len(), "wrote statistics");
        Ok(written)
    }

    /// Reads the persisted statistic `stat`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Missing`] if the file was never written.
    pub fn read_stats(&self, version: &str, stat: StatName) -> Result<ArrayCollection, CacheError> {
        let path = self.stats_filepath(version, stat)?;
        read_existing(&path)
    }
}

fn read_existing(path: &Path) -> Result<ArrayCollection, CacheError> {
    if !path.is_file() {
        return Err(CacheError::Missing {
            path: path.to_path_buf(),
        });
    }
    Ok(read_collection(path)?)
}

/// Writes to a temporary sibling and renames it over `path`, so readers
/// never observe a partial file.
fn write_atomic(path: &Path, collection: &ArrayCollection) -> Result<(), CacheError> {
    let dir = path
        .parent()
        .ok_or_else(|| CacheError::fs("resolve parent of", path, "no parent directory"))?;
    fs::create_dir_all(dir).map_err(|e| CacheError::fs("create directory", dir, e))?;

    let tmp = tempfile::Builder::new()
        .prefix(".fmprep-")
        .suffix(".nc.tmp")
        .tempfile_in(dir)
        .map_err(|e| CacheError::fs("create temporary file in", dir, e))?
        .into_temp_path();
    write_collection(&tmp, collection)?;
    tmp.persist(path)
        .map_err(|e| CacheError::fs("rename into", path, e.error))?;
    Ok(())
}
