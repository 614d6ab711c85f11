//! # Row-Major Addressing
//!
//! Conversion between a multi-dimensional coordinate and the flat index of
//! a point in storage. The last axis varies fastest.

use crate::error::SpaceError;

/// Flatten `coordinate` against `shape`.
///
/// # Errors
///
/// Returns [`SpaceError::TooManyIndices`] or [`SpaceError::TooFewIndices`]
/// if the arity is wrong, [`SpaceError::OutOfBounds`] for the first
/// index that exceeds its axis, and [`SpaceError::TooLarge`] if the flat
/// index does not fit in `usize`.
pub fn ravel_index(coordinate: &[usize], shape: &[usize]) -> Result<usize, SpaceError> {
    if coordinate.len() > shape.len() {
        return Err(SpaceError::TooManyIndices {
            given: coordinate.len(),
            shape: shape.to_vec(),
        });
    }
    if coordinate.len() < shape.len() {
        return Err(SpaceError::TooFewIndices {
            given: coordinate.len(),
            shape: shape.to_vec(),
        });
    }
    let mut linear = 0usize;
    for (axis, (&index, &size)) in coordinate.iter().zip(shape).enumerate() {
        if index >= size {
            return Err(SpaceError::OutOfBounds { index, axis, size });
        }
        linear = linear
            .checked_mul(size)
            .and_then(|scaled| scaled.checked_add(index))
            .ok_or_else(|| SpaceError::TooLarge {
                shape: shape.to_vec(),
            })?;
    }
    Ok(linear)
}

/// Expand a flat index into a coordinate against `shape`.
///
/// The caller guarantees `linear` is below the product of `shape`.
pub fn unravel_index(mut linear: usize, shape: &[usize]) -> Vec<usize> {
    let mut coordinate = vec![0; shape.len()];
    for (slot, &size) in coordinate.iter_mut().zip(shape).rev() {
        if size == 0 {
            continue;
        }
        *slot = linear % size;
        linear /= size;
    }
    coordinate
}
