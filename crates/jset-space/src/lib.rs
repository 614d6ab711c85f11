//! # jset-space
//!
//! Parameter-space generation over validated settings objects.
//!
//! A [`Space`] discovers every numeric range in a [`jset_core::Settings`]
//! graph, treats each independent range (and each group of ranges sharing
//! a match id) as one axis, and materializes the Cartesian product as
//! concrete settings objects, each revalidated against the original
//! schema. Points are addressed by multi-dimensional coordinate in
//! row-major order.
//!
//! ```
//! use jset_core::{PrimitiveKind, Schema};
//! use jset_space::Space;
//! use serde_json::json;
//!
//! let float = Schema::number("Float")
//!     .value_type(PrimitiveKind::Float)
//!     .build()
//!     .unwrap();
//! let main = Schema::record("Main")
//!     .field("x", &float)
//!     .field("y", &float)
//!     .build()
//!     .unwrap();
//! let settings = main
//!     .validate(&json!({
//!         "x": {"array": [1.0, 2.0]},
//!         "y": {"min": 0.0, "max": 1.0, "num": 3}
//!     }))
//!     .unwrap();
//!
//! let space = Space::new(&settings).unwrap();
//! assert_eq!(space.shape(), vec![2, 3]);
//! let point = space.get(&[1, 2]).unwrap();
//! assert_eq!(point.get("x").and_then(|n| n.as_f64()), Some(2.0));
//! assert_eq!(point.get("y").and_then(|n| n.as_f64()), Some(1.0));
//! ```
//!
//! ## Crate Policy
//!
//! - Building a space never mutates the settings it starts from.
//! - Every point is a fully concrete, independently valid settings object.

pub mod error;
pub mod explore;
pub mod index;
pub mod space;
pub mod summary;

pub use error::{SpaceError, SpaceWarning};
pub use explore::Restriction;
pub use index::{ravel_index, unravel_index};
pub use space::{Axis, Space};
pub use summary::Summary;
