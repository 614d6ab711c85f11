//! # Numeric Bound Checks
//!
//! Prebuilt checks for numeric leaves. Each applies to every sample, so a
//! range passes only if all of its samples are within bounds.
//!
//! ```
//! use jset_core::{bounds, PrimitiveKind, Schema};
//!
//! let thickness = Schema::number("Thickness")
//!     .value_type(PrimitiveKind::Float)
//!     .with_check(bounds::lower_bound(0.0))
//!     .build()
//!     .unwrap();
//! assert!(thickness.construct(&serde_json::json!(-1.0)).is_err());
//! ```

use std::sync::Arc;

use crate::error::CheckViolation;
use crate::schema::Check;
use crate::value::NumberValue;

fn bound(limit: f64, relation: &'static str, accept: fn(f64, f64) -> bool) -> Check<NumberValue> {
    Arc::new(move |value: &NumberValue| {
        if value.samples().iter().all(|n| accept(n.as_f64(), limit)) {
            Ok(())
        } else {
            Err(CheckViolation::Range(format!("must be {relation} {limit}")))
        }
    })
}

/// Every sample must be `>= limit`.
pub fn lower_bound(limit: f64) -> Check<NumberValue> {
    bound(limit, ">=", |x, l| x >= l)
}

/// Every sample must be `<= limit`.
pub fn upper_bound(limit: f64) -> Check<NumberValue> {
    bound(limit, "<=", |x, l| x <= l)
}

/// Every sample must be `> limit`.
pub fn lower_bound_exclusive(limit: f64) -> Check<NumberValue> {
    bound(limit, ">", |x, l| x > l)
}

/// Every sample must be `< limit`.
pub fn upper_bound_exclusive(limit: f64) -> Check<NumberValue> {
    bound(limit, "<", |x, l| x < l)
}

/// Every sample must lie in `[low, high]`.
pub fn within(low: f64, high: f64) -> Check<NumberValue> {
    let lower = lower_bound(low);
    let upper = upper_bound(high);
    Arc::new(move |value: &NumberValue| {
        lower(value)?;
        upper(value)
    })
}
