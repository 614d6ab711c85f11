//! # Settings Space
//!
//! The Cartesian product of every range discovered in a validated settings
//! object, realized as one fully concrete [`Settings`] per point.
//!
//! ## Axes
//!
//! Independent ranges become one axis each, in discovery order. Ranges
//! sharing a match id are zipped into one axis, appended after the
//! independent axes in first-seen order. A group whose ranges differ in
//! length is zipped to the shortest and a [`SpaceWarning`] is recorded;
//! the extra samples are dropped.
//!
//! ## Points
//!
//! Each point is produced by copying the original source document,
//! overwriting every range address with one sample (kept in the leaf's
//! numeric kind), and validating the copy from scratch against the
//! original schema. Points are stored in row-major order: the last axis
//! varies fastest. With no ranges the space has shape `[1]` and holds the
//! original settings unchanged.

use std::slice;

use jset_core::{Address, Numeric, Segment, Settings};
use serde_json::Value;

use crate::error::{SpaceError, SpaceWarning};
use crate::explore::{self, MatchGroup, RangeLeaf, Restriction};
use crate::index::{ravel_index, unravel_index};
use crate::summary::Summary;

/// One dimension of a space.
#[derive(Debug, Clone, PartialEq)]
pub enum Axis {
    /// A range varied on its own.
    Independent {
        /// Where the range lives.
        address: Address,
        /// Its samples.
        values: Vec<Numeric>,
    },
    /// Ranges sharing a match id, varied together.
    Matched {
        /// The shared match id.
        id: String,
        /// Where each grouped range lives, in discovery order.
        addresses: Vec<Address>,
        /// `values[i][j]` is the `i`-th sample of the range at `addresses[j]`.
        values: Vec<Vec<Numeric>>,
    },
}

impl Axis {
    fn independent(leaf: RangeLeaf) -> Self {
        Self::Independent {
            address: leaf.address,
            values: leaf.samples,
        }
    }

    fn matched(group: MatchGroup) -> Self {
        let len = group
            .leaves
            .iter()
            .map(|leaf| leaf.samples.len())
            .min()
            .unwrap_or(0);
        let values = (0..len)
            .map(|i| group.leaves.iter().map(|leaf| leaf.samples[i]).collect())
            .collect();
        Self::Matched {
            id: group.id,
            addresses: group.leaves.into_iter().map(|leaf| leaf.address).collect(),
            values,
        }
    }

    /// Number of positions along this axis.
    pub fn len(&self) -> usize {
        match self {
            Self::Independent { values, .. } => values.len(),
            Self::Matched { values, .. } => values.len(),
        }
    }

    /// Returns true if the axis has no positions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The match id of a grouped axis.
    pub fn match_id(&self) -> Option<&str> {
        match self {
            Self::Independent { .. } => None,
            Self::Matched { id, .. } => Some(id),
        }
    }

    /// Addresses of the ranges this axis varies.
    pub fn addresses(&self) -> &[Address] {
        match self {
            Self::Independent { address, .. } => slice::from_ref(address),
            Self::Matched { addresses, .. } => addresses,
        }
    }

    /// The samples written at position `index`, one per address.
    pub fn samples_at(&self, index: usize) -> Option<&[Numeric]> {
        match self {
            Self::Independent { values, .. } => values.get(index).map(slice::from_ref),
            Self::Matched { values, .. } => values.get(index).map(Vec::as_slice),
        }
    }
}

/// An addressable collection of concrete settings objects.
#[derive(Debug, Clone)]
pub struct Space {
    origin: Settings,
    axes: Vec<Axis>,
    points: Vec<Settings>,
    warnings: Vec<SpaceWarning>,
}

impl Space {
    /// Build the space of every range in `settings`.
    ///
    /// # Errors
    ///
    /// See [`Space::with_restriction`].
    pub fn new(settings: &Settings) -> Result<Self, SpaceError> {
        Self::with_restriction(settings, &Restriction::new())
    }

    /// Build the space of the ranges in `settings` that `restriction`
    /// leaves reachable.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::TooLarge`] if the point count overflows or
    /// storage for every point cannot be reserved,
    /// [`SpaceError::Substitution`] if a sample cannot be written back into
    /// the source document, and [`SpaceError::Regenerate`] if a point fails
    /// validation.
    pub fn with_restriction(settings: &Settings, restriction: &Restriction) -> Result<Self, SpaceError> {
        let discovery = explore::discover(settings.root(), restriction);

        let mut axes: Vec<Axis> = discovery.independent.into_iter().map(Axis::independent).collect();
        let mut warnings = Vec::new();
        for group in discovery.groups {
            let lengths: Vec<usize> = group.leaves.iter().map(|leaf| leaf.samples.len()).collect();
            if lengths.windows(2).any(|pair| pair[0] != pair[1]) {
                let warning = SpaceWarning::UnequalMatchLengths {
                    id: group.id.clone(),
                    lengths,
                };
                tracing::warn!("{warning}");
                warnings.push(warning);
            }
            axes.push(Axis::matched(group));
        }

        let points = build_points(settings, &axes)?;
        let space = Self {
            origin: settings.clone(),
            axes,
            points,
            warnings,
        };
        tracing::info!(shape = ?space.shape(), points = space.len(), "settings space built");
        Ok(space)
    }

    /// The settings object the space was built from.
    pub fn origin(&self) -> &Settings {
        &self.origin
    }

    /// The axes, independent ranges first, then match groups.
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Warnings raised while building.
    pub fn warnings(&self) -> &[SpaceWarning] {
        &self.warnings
    }

    /// Length of each axis; `[1]` when there are no ranges.
    pub fn shape(&self) -> Vec<usize> {
        if self.axes.is_empty() {
            vec![1]
        } else {
            self.axes.iter().map(Axis::len).collect()
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if some axis has length zero.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point at a coordinate with one index per axis.
    ///
    /// # Errors
    ///
    /// Returns an indexing [`SpaceError`] for wrong arity or an index out of
    /// bounds.
    pub fn get(&self, coordinate: &[usize]) -> Result<&Settings, SpaceError> {
        let linear = self.ravel(coordinate)?;
        self.get_linear(linear)
    }

    /// The point at a single index. Only valid for spaces with one axis
    /// (or none, where index `0` is the original settings).
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::TooManyIndices`] for spaces with several axes,
    /// or [`SpaceError::OutOfBounds`].
    pub fn at(&self, index: usize) -> Result<&Settings, SpaceError> {
        let shape = self.shape();
        if shape.len() > 1 {
            return Err(SpaceError::TooManyIndices { given: 1, shape });
        }
        self.get(&[index])
    }

    /// The point at a flat storage index.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::LinearOutOfBounds`] past the last point.
    pub fn get_linear(&self, index: usize) -> Result<&Settings, SpaceError> {
        self.points.get(index).ok_or(SpaceError::LinearOutOfBounds {
            index,
            len: self.points.len(),
        })
    }

    /// Flatten a coordinate to a storage index.
    ///
    /// # Errors
    ///
    /// Returns an indexing [`SpaceError`] for wrong arity or an index out of
    /// bounds.
    pub fn ravel(&self, coordinate: &[usize]) -> Result<usize, SpaceError> {
        ravel_index(coordinate, &self.shape())
    }

    /// Expand a storage index to a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::LinearOutOfBounds`] past the last point.
    pub fn unravel(&self, index: usize) -> Result<Vec<usize>, SpaceError> {
        if index >= self.points.len() {
            return Err(SpaceError::LinearOutOfBounds {
                index,
                len: self.points.len(),
            });
        }
        Ok(unravel_index(index, &self.shape()))
    }

    /// Storage index of the first point equal to `settings`.
    pub fn linear_index(&self, settings: &Settings) -> Option<usize> {
        self.points.iter().position(|point| point == settings)
    }

    /// Coordinate of the first point equal to `settings`.
    pub fn index(&self, settings: &Settings) -> Option<Vec<usize>> {
        self.linear_index(settings)
            .map(|linear| unravel_index(linear, &self.shape()))
    }

    /// The sole point, if the space holds exactly one.
    pub fn zero(&self) -> Option<&Settings> {
        match self.points.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Points in storage order.
    pub fn iter(&self) -> slice::Iter<'_, Settings> {
        self.points.iter()
    }

    /// Human-readable rendering of the shape and every axis.
    pub fn summary(&self) -> Summary<'_> {
        Summary::new(self)
    }
}

impl<'a> IntoIterator for &'a Space {
    type Item = &'a Settings;
    type IntoIter = slice::Iter<'a, Settings>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn build_points(settings: &Settings, axes: &[Axis]) -> Result<Vec<Settings>, SpaceError> {
    if axes.is_empty() {
        return Ok(vec![settings.clone()]);
    }
    let shape: Vec<usize> = axes.iter().map(Axis::len).collect();
    let too_large = || SpaceError::TooLarge { shape: shape.clone() };
    let total = shape
        .iter()
        .try_fold(1usize, |acc, &len| acc.checked_mul(len))
        .ok_or_else(too_large)?;

    let mut points = Vec::new();
    points.try_reserve_exact(total).map_err(|_| too_large())?;
    for linear in 0..total {
        let coordinate = unravel_index(linear, &shape);
        let mut source = settings.source().clone();
        for (axis, &position) in axes.iter().zip(&coordinate) {
            let samples = axis.samples_at(position).unwrap_or_default();
            for (address, &sample) in axis.addresses().iter().zip(samples) {
                substitute(&mut source, address, sample)?;
            }
        }
        let point = settings
            .schema()
            .validate(&source)
            .map_err(|source| SpaceError::Regenerate { index: linear, source })?;
        points.push(point);
    }
    Ok(points)
}

/// Overwrite the value at `address` in a raw document with one sample.
fn substitute(root: &mut Value, address: &Address, sample: Numeric) -> Result<(), SpaceError> {
    let failure = |reason: String| SpaceError::Substitution {
        address: address.clone(),
        reason,
    };
    let encoded = sample
        .to_json()
        .ok_or_else(|| failure(format!("{sample} has no JSON representation")))?;

    let mut slot = root;
    for segment in address.segments() {
        let next = match (segment, slot) {
            (Segment::Field(name) | Segment::Key(name), Value::Object(map)) => map.get_mut(name),
            (Segment::Index(idx), Value::Array(items)) => items.get_mut(*idx),
            _ => None,
        };
        slot = next.ok_or_else(|| failure(format!("source has no entry for {segment}")))?;
    }
    *slot = encoded;
    Ok(())
}
