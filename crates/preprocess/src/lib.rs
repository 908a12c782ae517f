//! # fmprep-preprocess
//!
//! Per-unit preprocessing of raw reanalysis files into the cache, fanned out
//! over a thread pool, with the workers' statistics reduced afterwards.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["UnitTask (collection, period, files)"] -->|"UnitProcessor::process()"| B["SourceFile"]
//!     B -->|"Resampler::subsample()"| C["ArrayCollection"]
//!     C -->|"CacheStore::process_unit()"| D["cache file"]
//!     C -->|"add_entry()"| E["StatsAccumulator"]
//!     E -->|"run_units(): merge in unit order"| F["RunOutput"]
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use fmprep_cache::{CacheStore, UnitKey};
//! use fmprep_calendar::TimePeriod;
//! use fmprep_preprocess::{UnitProcessor, UnitTask, run_units};
//! use fmprep_regrid::GridConfig;
//!
//! let store = CacheStore::new("/data/cache");
//! let processor = UnitProcessor::new(store.clone(), "v1", GridConfig::new()).unwrap();
//! let key = UnitKey::new(TimePeriod::month(2000, 1).unwrap()).with_collection("slv");
//! let tasks = vec![UnitTask::new(key, vec!["/data/raw/slv_200001.nc4".into()], ["T2M"])];
//! let output = run_units(&processor, &tasks, 4).unwrap();
//! store.write_stats("v1", &output.stats).unwrap();
//! println!("{}", output.summary);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `unit` | `UnitTask` |
//! | `processor` | `UnitProcessor`, `UnitReport` |
//! | `run` | `run_units`, `RunSummary`, `RunOutput` |
//! | `error` | Error types |

mod error;
mod processor;
mod run;
mod unit;

pub use error::PreprocessError;
pub use processor::{UnitProcessor, UnitReport};
pub use run::{RunOutput, RunSummary, UnitFailure, run_units};
pub use unit::UnitTask;
