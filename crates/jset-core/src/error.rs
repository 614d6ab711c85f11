//! # Error Types — Route-Annotated Validation Failures
//!
//! Two families of errors live here and never mix:
//!
//! - [`SchemaContractError`]: the schema descriptor itself is missing its
//!   declared type/options or declares them wrongly. Raised by the schema
//!   builders, before any data is seen.
//! - [`SettingsError`]: raw data failed validation. It carries one flat
//!   [`Address`] route from the root to the failing node plus the root
//!   [`Cause`]. Each recursion boundary prepends its own segment via
//!   [`SettingsError::within`] instead of wrapping.
//!
//! ## Rendering
//!
//! Routes render with ` -> ` between segments, except that bracketed
//! index/key segments attach directly to their parent:
//!
//! ```text
//! layers[0] -> thickness -> must be >= 0
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One step in a path through a settings object graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Segment {
    /// A declared field of a record.
    Field(String),
    /// A position in a homogeneous sequence.
    Index(usize),
    /// An entry of a homogeneous keyed collection.
    Key(String),
}

impl Segment {
    /// Returns true for segments rendered in brackets.
    pub fn is_bracketed(&self) -> bool {
        matches!(self, Self::Index(_) | Self::Key(_))
    }

    /// The field or key name. `None` for indices.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Field(name) | Self::Key(name) => Some(name),
            Self::Index(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(idx) => write!(f, "[{idx}]"),
            Self::Key(key) => write!(f, "[{key}]"),
        }
    }
}

/// An ordered path from the root of a settings graph to one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Vec<Segment>);

impl Address {
    /// The empty address, denoting the root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The segments, root first.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the root address.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The last segment, if any.
    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// Append a segment at the leaf end.
    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    /// Remove the leaf-end segment.
    pub fn pop(&mut self) -> Option<Segment> {
        self.0.pop()
    }

    /// Insert a segment at the root end.
    pub fn prepend(&mut self, segment: Segment) {
        self.0.insert(0, segment);
    }

    /// A copy of this address extended by one segment.
    pub fn child(&self, segment: Segment) -> Self {
        let mut next = self.clone();
        next.push(segment);
        next
    }
}

impl From<Vec<Segment>> for Address {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl FromIterator<Segment> for Address {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 && !segment.is_bracketed() {
                f.write_str(" -> ")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// The error a schema descriptor raises when its declaration is absent or
/// malformed. This is a programming error in the schema, not a data error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaContractError {
    /// A schema was given an empty name.
    #[error("schema name must not be empty")]
    EmptyName,

    /// The element/value type was never declared.
    #[error("the {schema} schema does not declare a value type")]
    TypeNotDeclared {
        /// Name of the offending schema.
        schema: String,
    },

    /// The declared type is not one this schema variant can hold.
    #[error("the {schema} schema declares type {declared}, expected one of: {accepted}")]
    TypeMalformed {
        /// Name of the offending schema.
        schema: String,
        /// The declared type.
        declared: String,
        /// The types this variant accepts.
        accepted: String,
    },

    /// A string-selection schema never declared its options.
    #[error("the {schema} schema does not declare its options")]
    OptionsNotDeclared {
        /// Name of the offending schema.
        schema: String,
    },

    /// The options list is empty or repeats a value.
    #[error("the {schema} schema options must be a non-empty list of distinct strings")]
    OptionsMalformed {
        /// Name of the offending schema.
        schema: String,
    },

    /// A record declares the same field twice.
    #[error("the {schema} schema declares field '{field}' more than once")]
    DuplicateField {
        /// Name of the offending schema.
        schema: String,
        /// The repeated field name.
        field: String,
    },
}

/// A domain error raised by a custom leaf check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckViolation {
    /// The value has an unacceptable type or form.
    #[error("{0}")]
    Type(String),

    /// The value lies outside acceptable bounds.
    #[error("{0}")]
    Range(String),
}

/// The low-level reason a validation failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Cause {
    /// The raw value's runtime type disagrees with the declared type.
    #[error("Expecting: {expected} | Received: {actual}")]
    TypeMismatch {
        /// The declared type, rendered.
        expected: String,
        /// The runtime type of the raw value.
        actual: String,
    },

    /// A required key is absent from keyed input.
    #[error("Setting not found.")]
    NotFound,

    /// A range specification lacks `min`, `max` or `num`.
    #[error("No '{key}' parameter provided for range")]
    RangeKeyMissing {
        /// The missing key.
        key: String,
    },

    /// A range specification key holds the wrong type.
    #[error("The '{key}' parameter was not {expected}")]
    RangeTypeMismatch {
        /// The offending key.
        key: String,
        /// The type it should have held.
        expected: String,
    },

    /// A range asks for more samples than a single leaf may hold.
    #[error("The 'num' parameter {requested} exceeds the limit of {limit} samples")]
    RangeTooLarge {
        /// The absolute value of `num`.
        requested: u64,
        /// The largest accepted sample count.
        limit: usize,
    },

    /// A string is not in the schema's allowed set.
    #[error("must be one of {allowed:?}")]
    SelectionInvalid {
        /// The allowed values.
        allowed: Vec<String>,
        /// The rejected value.
        value: String,
    },

    /// A custom leaf check rejected the value.
    #[error("{violation}")]
    CheckFailed {
        /// What the check raised.
        violation: CheckViolation,
        /// The raw value that failed.
        value: Value,
    },

    /// A record's cross-field consistency check rejected the record.
    #[error("{0}")]
    ConsistencyFailed(String),
}

/// A validation failure: one flat route plus the root cause.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsError {
    route: Address,
    cause: Cause,
}

impl SettingsError {
    /// A failure at the current node, with an empty route.
    pub fn new(cause: Cause) -> Self {
        Self {
            route: Address::root(),
            cause,
        }
    }

    /// Shorthand for a [`Cause::TypeMismatch`].
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(Cause::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        })
    }

    /// Prepend the enclosing segment as the failure crosses a recursion
    /// boundary on its way to the root.
    #[must_use]
    pub fn within(mut self, segment: Segment) -> Self {
        self.route.prepend(segment);
        self
    }

    /// Path from the root to the failing node.
    pub fn route(&self) -> &Address {
        &self.route
    }

    /// The root cause.
    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// Consume the error, returning route and cause.
    pub fn into_parts(self) -> (Address, Cause) {
        (self.route, self.cause)
    }
}

impl From<Cause> for SettingsError {
    fn from(cause: Cause) -> Self {
        Self::new(cause)
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.route.is_empty() {
            write!(f, "{}", self.cause)
        } else {
            write!(f, "{} -> {}", self.route, self.cause)
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Segment {
        Segment::Field(name.to_string())
    }

    #[test]
    fn test_within_prepends_segments() {
        let err = SettingsError::new(Cause::NotFound)
            .within(field("fourth"))
            .within(field("second"))
            .within(field("first"));
        let names: Vec<String> = err.route().segments().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["first", "second", "fourth"]);
        assert_eq!(err.cause(), &Cause::NotFound);
    }

    #[test]
    fn test_message_collapses_before_index() {
        let err = SettingsError::type_mismatch("int", "str")
            .within(Segment::Index(0))
            .within(field("layers"));
        assert_eq!(err.to_string(), "layers[0] -> Expecting: int | Received: str");
    }

    #[test]
    fn test_message_collapses_before_key() {
        let err = SettingsError::new(Cause::NotFound)
            .within(field("depth"))
            .within(Segment::Key("north".to_string()))
            .within(field("regions"));
        assert_eq!(err.to_string(), "regions[north] -> depth -> Setting not found.");
    }

    #[test]
    fn test_message_without_route_is_cause() {
        let err = SettingsError::new(Cause::RangeKeyMissing {
            key: "num".to_string(),
        });
        assert_eq!(err.to_string(), "No 'num' parameter provided for range");
    }

    #[test]
    fn test_check_failed_renders_violation() {
        let err = SettingsError::new(Cause::CheckFailed {
            violation: CheckViolation::Range("must be >= 0".to_string()),
            value: serde_json::json!(-1.0),
        })
        .within(field("thickness"));
        assert_eq!(err.to_string(), "thickness -> must be >= 0");
    }

    #[test]
    fn test_address_display_leading_index() {
        let address: Address = vec![Segment::Index(2), field("a")].into();
        assert_eq!(address.to_string(), "[2] -> a");
    }

    #[test]
    fn test_segment_names() {
        assert_eq!(field("a").name(), Some("a"));
        assert_eq!(Segment::Key("k".to_string()).name(), Some("k"));
        assert_eq!(Segment::Index(1).name(), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = Segment> {
        prop_oneof![
            "[a-z]{1,6}".prop_map(Segment::Field),
            (0usize..50).prop_map(Segment::Index),
            "[a-z]{1,6}".prop_map(Segment::Key),
        ]
    }

    proptest! {
        /// Only bare field segments after the first are preceded by a
        /// separator.
        #[test]
        fn separator_count_matches_bare_segments(segments in prop::collection::vec(segment(), 0..8)) {
            let expected = segments
                .iter()
                .skip(1)
                .filter(|segment| !segment.is_bracketed())
                .count();
            let rendered = Address::from(segments).to_string();
            prop_assert_eq!(rendered.matches(" -> ").count(), expected);
        }
    }
}
