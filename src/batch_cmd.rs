//! Batch command: assemble a feature tensor from cached units.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use fmprep_array::ArrayCollection;
use fmprep_batch::BatchAssembler;
use fmprep_cache::CacheStore;
use fmprep_io::write_collection;

use crate::cli::BatchArgs;
use crate::config::FmprepConfig;
use crate::convert;

/// Load a batch of days, add derived features and stack them.
pub fn run(args: BatchArgs) -> Result<()> {
    let _cmd = info_span!("batch").entered();
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: FmprepConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    let task = convert::build_task_config(&config.task)?;
    let store = CacheStore::new(&config.platform.cache_root);
    let assembler = BatchAssembler::new(store, &config.preprocess.version, task)?;

    let end = args.end.unwrap_or(args.start);
    let mut batch = assembler
        .load_batch(args.start, end)
        .with_context(|| format!("failed to load batch {} .. {end}", args.start))?;
    if !args.no_derived {
        batch = assembler.add_derived_vars(batch)?;
    }
    let features = assembler.to_feature_array(&batch)?;
    info!(dims = ?features.dims(), shape = ?features.shape(), "assembled feature tensor");
    println!("{} {:?} {:?}", features.name(), features.dims(), features.shape());

    if let Some(ref output) = args.output {
        let collection = ArrayCollection::new().with(features);
        write_collection(output, &collection)
            .with_context(|| format!("failed to write NetCDF: {}", output.display()))?;
        info!(path = %output.display(), "feature tensor written");
    }
    Ok(())
}
