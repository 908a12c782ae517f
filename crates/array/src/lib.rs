//! # fmprep-array
//!
//! Labeled n-dimensional arrays for gridded atmospheric fields.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["raw LabeledArray"] -->|"CoordinateMapper::apply()"| B["canonical axes"]
//!     B -->|".interp_axis()"| C["target grid"]
//!     C -->|".reduce()"| D["reduced array"]
//!     C -->|"concat() / stack_features()"| E["combined array"]
//!     C -->|".canonical_order()"| F["(t, z, y, x)"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use fmprep_array::{CoordinateMapper, LabeledArray, X};
//!
//! let raw = LabeledArray::from_vec("T", &["lon"], &[3], vec![0.0, 1.0, 2.0])
//!     .unwrap()
//!     .with_coord("lon", vec![0.0, 10.0, 20.0])
//!     .unwrap();
//! let mapper = CoordinateMapper::from_pairs([("lon", X)]);
//! let arr = mapper.apply(raw).unwrap();
//! let fine = arr.interp_axis(X, &[5.0, 15.0], true).unwrap();
//! assert_eq!(fine.data().as_slice().unwrap(), &[0.5, 1.5]);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `array` | `LabeledArray` and selection |
//! | `attrs` | Attribute values |
//! | `coord` | Axis coordinates and canonical names |
//! | `collection` | Named arrays with global attributes |
//! | `mapper` | Axis and variable renaming |
//! | `interp` | Linear interpolation |
//! | `ops` | Concatenation, stacking, broadcasting, differences |
//! | `reduce` | Reductions over named axes |
//! | `error` | Error types |

mod array;
mod attrs;
mod collection;
mod coord;
mod error;
mod interp;
mod mapper;
mod ops;
mod reduce;

pub use array::LabeledArray;
pub use attrs::{AttrValue, Attrs};
pub use collection::ArrayCollection;
pub use coord::{CANONICAL_ORDER, Coordinate, FEATURE, T, X, Y, Z, is_increasing};
pub use error::ArrayError;
pub use mapper::CoordinateMapper;
pub use ops::{concat, stack_features};
