//! # Space Summary
//!
//! Plain-text description of a [`Space`]: its shape, then every axis with
//! the addresses it varies and the values it takes.
//!
//! ```text
//! Computational space dimensions: 2 x 3
//! axis: 0:
//! 	a -> x
//! 	values: [1.0, 2.0]
//! axis: 1:
//! 	match_id: m
//! 	b
//! 	c[0]
//! 	values: [(1.0, 4.0), (2.0, 5.0), (3.0, 6.0)]
//! ```

use std::fmt;

use jset_core::Numeric;

use crate::space::{Axis, Space};

/// Borrowed [`Display`](fmt::Display) adapter returned by [`Space::summary`].
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a> {
    space: &'a Space,
}

impl<'a> Summary<'a> {
    pub(crate) fn new(space: &'a Space) -> Self {
        Self { space }
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.space.shape().iter().map(usize::to_string).collect();
        write!(f, "Computational space dimensions: {}", dims.join(" x "))?;

        for (position, axis) in self.space.axes().iter().enumerate() {
            write!(f, "\naxis: {position}:")?;
            if let Some(id) = axis.match_id() {
                write!(f, "\n\tmatch_id: {id}")?;
            }
            for address in axis.addresses() {
                write!(f, "\n\t{address}")?;
            }
            write!(f, "\n\tvalues: [{}]", render_values(axis))?;
        }
        Ok(())
    }
}

fn render_values(axis: &Axis) -> String {
    match axis {
        Axis::Independent { values, .. } => join(values),
        Axis::Matched { values, .. } => values
            .iter()
            .map(|tuple| format!("({})", join(tuple)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn join(values: &[Numeric]) -> String {
    values
        .iter()
        .map(Numeric::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
