//! # fmprep-cache
//!
//! Deterministic, version-qualified cache of processed units and the
//! persisted normalization statistics.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["UnitKey"] -->|"cache_filepath()"| B["{root}/{version}/{collection}/{period}.nc"]
//!     C["compute closure"] -->|"process_unit()"| D{"file exists?"}
//!     D -->|"yes, no reprocess"| E["Skipped"]
//!     D -->|"no"| F["temp file + rename"] --> G["Written"]
//!     H["StatsAccumulator"] -->|"write_stats()"| I["stats/mean.nc, std.nc, std_diff.nc"]
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use fmprep_array::{ArrayCollection, LabeledArray};
//! use fmprep_cache::{CacheError, CacheStore, UnitKey, UnitOutcome};
//! use fmprep_calendar::TimePeriod;
//!
//! let store = CacheStore::new("/data/cache");
//! let key = UnitKey::new(TimePeriod::month(2000, 1).unwrap()).with_collection("slv");
//! let outcome = store
//!     .process_unit::<_, CacheError>("v1", &key, false, || {
//!         let t2m = LabeledArray::from_vec("T2M", &["x"], &[2], vec![280.0, 281.0])?;
//!         Ok(ArrayCollection::new().with(t2m))
//!     })
//!     .unwrap();
//! assert!(matches!(outcome, UnitOutcome::Written(_) | UnitOutcome::Skipped(_)));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `key` | `UnitKey` and path-component rules |
//! | `store` | `CacheStore`, `UnitOutcome`, atomic writes |
//! | `error` | Error types |

mod error;
mod key;
mod store;

pub use error::CacheError;
pub use key::{STATS_DIR, UnitKey};
pub use store::{CACHE_EXTENSION, CacheStore, UnitOutcome};
