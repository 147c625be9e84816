//! A single spatially tagged value.

use braid_core::Point;

/// A `(Point, value)` pair pushed under some tag.
#[derive(Clone, Debug, PartialEq)]
pub struct TaggedValue {
    /// Where the value lives.
    pub point: Point,
    /// The scalar payload.
    pub value: f64,
}

impl TaggedValue {
    /// Pair a point with a value.
    pub fn new(point: Point, value: f64) -> Self {
        Self { point, value }
    }
}
