//! Stats command: recompute normalization statistics from the cache.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use fmprep_cache::CacheStore;
use fmprep_stats::StatsAccumulator;

use crate::cli::StatsArgs;
use crate::config::FmprepConfig;

/// Rebuild `mean`, `std` and `std_diff` from every cached unit.
pub fn run(args: StatsArgs) -> Result<()> {
    let _cmd = info_span!("stats").entered();
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: FmprepConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    let store = CacheStore::new(&config.platform.cache_root);
    let version = &config.preprocess.version;
    let mut stats = StatsAccumulator::new();
    let mut n_units = 0;
    for collection in &config.preprocess.collections {
        let keys = store
            .list_units(version, Some(collection.name.as_str()))
            .with_context(|| format!("failed to list cached units of {}", collection.name))?;
        if keys.is_empty() {
            warn!(collection = %collection.name, "no cached units");
        }
        for key in keys {
            let unit = store
                .read_unit(version, &key)
                .with_context(|| format!("failed to read cached unit {key}"))?;
            for var in &collection.vars {
                if let Some(array) = unit.get(var) {
                    stats.add_entry(var, array)?;
                }
            }
            n_units += 1;
        }
    }
    if stats.is_empty() {
        bail!("no cached variables found under version {version:?}");
    }

    let paths = store
        .write_stats(version, &stats)
        .context("failed to write statistics")?;
    info!(units = n_units, files = paths.len(), "statistics rebuilt");
    println!("{} units, {} variables", n_units, stats.variables().len());
    Ok(())
}
