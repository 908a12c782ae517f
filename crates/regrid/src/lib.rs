//! Regridding of raw reanalysis variables onto a canonical grid.
//!
//! Each raw variable is renamed to canonical axes, masked, interpolated onto
//! the target x/y/z coordinates, aggregated onto the configured time step and
//! gap filled.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!  │ rename axes  │──▶│ mask sentinel│──▶│ interpolate  │──▶│ aggregate t  │
//!  └──────────────┘   └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                                                   ▼
//!                                        ┌──────────────┐   ┌──────────────┐
//!                                        │  canonical   │◀──│  fill gaps   │
//!                                        └──────────────┘   └──────────────┘
//! ```
//!
//! # Quick start
//!
//! ```
//! use fmprep_array::{Attrs, CoordinateMapper, LabeledArray};
//! use fmprep_regrid::{GridConfig, QuantityType, Resampler};
//!
//! let raw = LabeledArray::from_vec("T2M", &["lat", "lon"], &[2, 3], vec![1.0; 6])
//!     .unwrap()
//!     .with_coord("lat", vec![0.0, 1.0])
//!     .unwrap()
//!     .with_coord("lon", vec![0.0, 1.0, 2.0])
//!     .unwrap();
//! let config = GridConfig::new()
//!     .with_xres(0.5)
//!     .with_dims(CoordinateMapper::from_pairs([("lat", "y"), ("lon", "x")]));
//! let resampler = Resampler::new(config).unwrap();
//! let targets = resampler.resolve_targets(&raw).unwrap();
//! let out = resampler
//!     .subsample(raw, &Attrs::new(), QuantityType::Intensive, false, &targets)
//!     .unwrap();
//! assert_eq!(out.dims(), &["y", "x"]);
//! // [0, 2.25) in steps of 0.5
//! assert_eq!(out.len_of("x"), Some(5));
//! ```

mod config;
mod error;
mod gap;
mod quantity;
mod resampler;
mod sentinel;
mod target;
mod temporal;

pub use config::GridConfig;
pub use error::{GapError, RegridError};
pub use gap::replace_nans;
pub use quantity::{Aggregation, QuantityType};
pub use resampler::{QTYPE_ATTR, Resampler};
pub use sentinel::{SENTINEL_KEYS, mask_sentinel};
pub use target::{AxisTarget, TargetCoords};
pub use temporal::{MONTH_ATTR, MONTHLY_MIN_STEP_SECONDS, aggregate_time, is_monthly};
