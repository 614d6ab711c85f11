//! # Space Errors and Warnings

use std::fmt;

use jset_core::{Address, SettingsError};
use thiserror::Error;

/// Error building or indexing a [`crate::Space`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpaceError {
    /// More indices than the space has axes.
    #[error("too many indices for array {shape:?}: got {given}")]
    TooManyIndices {
        /// Number of indices supplied.
        given: usize,
        /// Shape of the space.
        shape: Vec<usize>,
    },

    /// Fewer indices than the space has axes.
    #[error("too few indices for array {shape:?}: got {given}")]
    TooFewIndices {
        /// Number of indices supplied.
        given: usize,
        /// Shape of the space.
        shape: Vec<usize>,
    },

    /// An index exceeds its axis.
    #[error("index {index} is out of bounds for axis {axis} with size {size}")]
    OutOfBounds {
        /// The offending index.
        index: usize,
        /// The axis it addresses.
        axis: usize,
        /// Length of that axis.
        size: usize,
    },

    /// A flat index exceeds the number of points.
    #[error("linear index {index} is out of bounds for space of {len} points")]
    LinearOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of points.
        len: usize,
    },

    /// The product of the axis lengths does not fit in `usize`.
    #[error("space of shape {shape:?} has too many points to address")]
    TooLarge {
        /// Axis lengths.
        shape: Vec<usize>,
    },

    /// A range sample could not be written back into the source document.
    #[error("cannot substitute range sample at {address}: {reason}")]
    Substitution {
        /// Where the sample was to be written.
        address: Address,
        /// Why it could not be written.
        reason: String,
    },

    /// A regenerated point failed validation, e.g. a consistency check
    /// rejected one combination of samples.
    #[error("point {index} failed validation: {source}")]
    Regenerate {
        /// Linear index of the point.
        index: usize,
        /// The validation failure.
        #[source]
        source: SettingsError,
    },
}

/// A non-fatal condition noticed while building a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceWarning {
    /// Ranges sharing a match id have different lengths; the group axis was
    /// zipped to the shortest and the remaining samples dropped.
    UnequalMatchLengths {
        /// The match id.
        id: String,
        /// Length of each grouped range, in discovery order.
        lengths: Vec<usize>,
    },
}

impl fmt::Display for SpaceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnequalMatchLengths { id, .. } => write!(
                f,
                "ranges with match id '{id}' have unequal length. Zipped to shortest."
            ),
        }
    }
}
