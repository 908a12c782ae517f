//! Preprocess command: resample raw source files into the cache.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use fmprep_cache::CacheStore;
use fmprep_preprocess::{UnitProcessor, run_units};

use crate::cli::PreprocessArgs;
use crate::config::FmprepConfig;
use crate::{convert, discover};

/// Run the preprocessing pipeline over the configured date range.
pub fn run(args: PreprocessArgs) -> Result<()> {
    let _cmd = info_span!("preprocess").entered();
    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: FmprepConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    // 2. Build the processor
    let grid = convert::build_grid_config(&config.preprocess)?;
    let store = CacheStore::new(&config.platform.cache_root);
    let version = &config.preprocess.version;
    let processor = UnitProcessor::new(store.clone(), version, grid)
        .context("failed to build unit processor")?
        .with_reprocess(args.reprocess || config.preprocess.reprocess);

    // 3. Discover units
    let tasks = discover::unit_tasks(&config)?;
    info!(
        units = tasks.len(),
        start = %config.preprocess.start,
        end = %config.preprocess.end,
        "discovered units"
    );

    // 4. Process in parallel
    let threads = args.threads.unwrap_or(config.platform.threads);
    let output = run_units(&processor, &tasks, threads)?;
    println!("{}", output.summary);
    for failure in &output.summary.failed {
        eprintln!("  {}: {}", failure.key, failure.error);
    }

    // 5. Persist statistics
    if output.stats.is_empty() {
        info!("no statistics recorded");
    } else {
        let paths = store
            .write_stats(version, &output.stats)
            .context("failed to write statistics")?;
        for path in &paths {
            info!(path = %path.display(), "statistics written");
        }
    }

    if !output.summary.is_success() {
        bail!("{} of {} units failed", output.summary.failed.len(), output.summary.total());
    }
    Ok(())
}
