//! # fmprep-batch
//!
//! Assembles cached units into model-facing batches: per-day loading, merge
//! along time, level selection, cyclical calendar features and a stacked
//! feature tensor.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["CacheStore"] -->|"load_timestep(date)"| B["ArrayCollection per day"]
//!     B -->|"merge_batch()"| C["ArrayCollection over range"]
//!     C -->|"add_derived_vars()"| D["+ year/day progress"]
//!     D -->|"to_feature_array()"| E["LabeledArray (..., feature)"]
//!     A -->|"load_norm_data()"| F["NormData"]
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use fmprep_array::CoordinateMapper;
//! use fmprep_batch::{BatchAssembler, TaskConfig};
//! use fmprep_cache::CacheStore;
//! use fmprep_calendar::Date;
//!
//! let task = TaskConfig::new()
//!     .with_collections(["slv"])
//!     .with_input_variables([("2m_temperature", "T2M")])
//!     .with_coords(CoordinateMapper::from_pairs([("t", "time"), ("x", "lon"), ("y", "lat")]));
//! let assembler = BatchAssembler::new(CacheStore::new("/data/cache"), "v1", task).unwrap();
//! let start = Date::new(2000, 1, 1).unwrap();
//! let batch = assembler.load_batch(start, Date::new(2000, 1, 2).unwrap()).unwrap();
//! let batch = assembler.add_derived_vars(batch).unwrap();
//! let tensor = assembler.to_feature_array(&batch).unwrap();
//! assert_eq!(tensor.dims().last().map(String::as_str), Some("feature"));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | `TaskConfig` |
//! | `assembler` | `BatchAssembler`, `NormData` |
//! | `derived` | Year/day progress features |
//! | `error` | Error types |

mod assembler;
mod config;
mod derived;
mod error;

pub use assembler::{BatchAssembler, FEATURES, NormData};
pub use config::TaskConfig;
pub use derived::{
    AVG_DAY_PER_YEAR, DAY_PROGRESS, SEC_PER_DAY, YEAR_PROGRESS, featurize_progress, get_day_progress,
    get_year_progress, progress_features,
};
pub use error::BatchError;
