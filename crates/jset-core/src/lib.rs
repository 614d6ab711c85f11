//! # jset-core — Typed Settings from Loosely-Typed Data
//!
//! Validates a generic `serde_json::Value` tree (decoded from JSON, YAML or
//! similar) against an explicit schema descriptor and materializes a typed,
//! immutable object graph.
//!
//! ## Schema Node Model (`schema`)
//!
//! Schemas are declared once through builders and shared behind `Arc`:
//! records, homogeneous sequences, homogeneous keyed collections, terminal
//! leaves, numeric leaves (scalar, explicit array, or interpolated range)
//! and string-selection leaves. A missing or malformed declaration is a
//! [`SchemaContractError`], raised by `build()` and never confused with a
//! data error.
//!
//! ## Validation (`engine`, `number`)
//!
//! [`Schema::validate`] walks the descriptor and the raw data together,
//! runs per-leaf checks and per-record consistency checks, and returns a
//! [`Settings`] root that also retains the raw source verbatim.
//!
//! ## Errors (`error`)
//!
//! Every data failure is a single [`SettingsError`]: a flat route of
//! [`Segment`]s from the root plus one root [`Cause`].
//!
//! ## Example
//!
//! ```
//! use jset_core::{PrimitiveKind, Schema};
//! use serde_json::json;
//!
//! let length = Schema::number("Length").value_type(PrimitiveKind::Float).build().unwrap();
//! let main = Schema::record("Main")
//!     .field("length", &length)
//!     .field("label", PrimitiveKind::String)
//!     .build()
//!     .unwrap();
//!
//! let settings = main.validate(&json!({"length": 2.5, "label": "x"})).unwrap();
//! assert_eq!(settings.get("length").and_then(|n| n.as_f64()), Some(2.5));
//!
//! let err = main.validate(&json!({"length": 2.5})).unwrap_err();
//! assert_eq!(err.to_string(), "label -> Setting not found.");
//! ```
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jset-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod bounds;
mod engine;
pub mod error;
pub mod node;
mod number;
pub mod schema;
pub mod source;
pub mod value;

pub use error::{Address, Cause, CheckViolation, SchemaContractError, Segment, SettingsError};
pub use node::{Children, Node, NumberLeaf, Record, Settings};
pub use number::{linspace, MAX_RANGE_SAMPLES};
pub use schema::{Check, ConsistencyCheck, FieldType, Schema, SchemaKind};
pub use source::SourceError;
pub use value::{NumberValue, Numeric, NumericKind, PrimitiveKind, Scalar};
