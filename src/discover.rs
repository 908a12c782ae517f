//! Raw source file discovery from the platform directory templates.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use fmprep_cache::UnitKey;
use fmprep_calendar::{Date, TimePeriod, date_range, periods_between};
use fmprep_preprocess::UnitTask;

use crate::config::{FmprepConfig, PlatformToml};

const PLACEHOLDERS: [&str; 4] = ["collection", "year", "month", "day"];
const SOURCE_EXTENSIONS: [&str; 2] = ["nc", "nc4"];

/// Rejects placeholders other than `{collection}`, `{year}`, `{month}` and
/// `{day}`.
pub fn check_template(template: &str) -> Result<()> {
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            bail!("unclosed placeholder in template {template:?}");
        };
        let name = &after[..close];
        if !PLACEHOLDERS.contains(&name) {
            bail!("unknown placeholder {{{name}}} in template {template:?}");
        }
        rest = &after[close + 1..];
    }
    Ok(())
}

/// Fills the placeholders of `template`; month and day are zero-padded.
pub fn expand(template: &str, collection: &str, date: Date) -> String {
    template
        .replace("{collection}", collection)
        .replace("{year}", &format!("{:04}", date.year()))
        .replace("{month}", &format!("{:02}", date.month()))
        .replace("{day}", &format!("{:02}", date.day()))
}

/// Every source file of `collection` for the dates of `period`, sorted.
///
/// The directory and filename templates are expanded for each date of the
/// period and resolved as a glob under `source_root`, so a `{day}`-level
/// layout is found under a monthly unit. Without a filename template every
/// `*.nc`/`*.nc4` file of the directory matches.
pub fn source_files(platform: &PlatformToml, collection: &str, period: TimePeriod) -> Result<Vec<PathBuf>> {
    let root = glob::Pattern::escape(&platform.source_root.to_string_lossy());
    let mut patterns = BTreeSet::new();
    for date in date_range(period.first_date(), period.last_date())? {
        let dir = expand(&platform.source_dir_template, collection, date);
        let name = platform
            .source_name_template
            .as_deref()
            .map_or_else(|| "*".to_string(), |t| expand(t, collection, date));
        patterns.insert(format!("{root}/{dir}/{name}"));
    }

    let mut files = BTreeSet::new();
    for pattern in &patterns {
        files.extend(glob_sources(pattern)?);
    }
    Ok(files.into_iter().collect())
}

fn glob_sources(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).with_context(|| format!("invalid source file pattern: {pattern}"))?;
    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                let is_source = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e));
                if is_source && path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => warn!(error = %e, "unreadable path while globbing sources"),
        }
    }
    debug!(pattern, files = files.len(), "globbed source files");
    Ok(files)
}

/// One task per (period, collection) over `[start, end]`, periods in order.
pub fn unit_tasks(config: &FmprepConfig) -> Result<Vec<UnitTask>> {
    let platform = &config.platform;
    let pre = &config.preprocess;
    check_template(&platform.source_dir_template)?;
    if let Some(ref template) = platform.source_name_template {
        check_template(template)?;
    }
    if pre.collections.is_empty() {
        bail!("no collections configured: add [[preprocess.collections]] entries");
    }

    let periods = periods_between(pre.start, pre.end, pre.granularity)?;
    let mut tasks = Vec::with_capacity(periods.len() * pre.collections.len());
    for period in periods {
        for collection in &pre.collections {
            let files = source_files(platform, &collection.name, period)?;
            if files.is_empty() {
                warn!(collection = %collection.name, period = %period, "no source files found");
            }
            debug!(collection = %collection.name, period = %period, files = files.len(), "discovered unit");
            let key = UnitKey::new(period).with_collection(collection.name.clone());
            tasks.push(
                UnitTask::new(key, files, collection.vars.iter().cloned())
                    .with_constant(collection.constant),
            );
        }
    }
    Ok(tasks)
}
