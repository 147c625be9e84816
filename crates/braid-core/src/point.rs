//! The [`Point`] coordinate type.

use std::fmt;
use std::ops::Index;

use smallvec::SmallVec;

/// Storage for point coordinates.
///
/// Uses `SmallVec<[f64; 3]>` so 1D, 2D and 3D points never touch the
/// heap. Higher-dimensional points spill transparently.
pub type Coords = SmallVec<[f64; 3]>;

/// An immutable spatial coordinate tuple.
///
/// A point has no identity beyond its coordinate values. Its
/// dimensionality is checked against the owning interface's
/// configuration on push and fetch, not at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    coords: Coords,
}

impl Point {
    /// Build a point from its coordinates.
    pub fn new(coords: impl IntoIterator<Item = f64>) -> Self {
        Self {
            coords: coords.into_iter().collect(),
        }
    }

    /// Number of coordinates.
    pub fn dims(&self) -> usize {
        self.coords.len()
    }

    /// The coordinates as a slice.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Only the shared leading coordinates are compared; callers check
    /// dimensionality first.
    pub fn distance_sq(&self, other: &Point) -> f64 {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    /// Whether every coordinate of `other` lies within `tolerance` of ours.
    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        self.dims() == other.dims()
            && self
                .coords
                .iter()
                .zip(other.coords.iter())
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }
}

impl Index<usize> for Point {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        &self.coords[axis]
    }
}

impl<const N: usize> From<[f64; N]> for Point {
    fn from(coords: [f64; N]) -> Self {
        Self::new(coords)
    }
}

impl From<&[f64]> for Point {
    fn from(coords: &[f64]) -> Self {
        Self::new(coords.iter().copied())
    }
}

impl From<Vec<f64>> for Point {
    fn from(coords: Vec<f64>) -> Self {
        Self::new(coords)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_array_keeps_order() {
        let p = Point::from([3.0, 4.0]);
        assert_eq!(p.dims(), 2);
        assert_eq!(p[0], 3.0);
        assert_eq!(p[1], 4.0);
    }

    #[test]
    fn display_lists_coordinates() {
        assert_eq!(Point::from([1.0, 2.5]).to_string(), "(1, 2.5)");
        assert_eq!(Point::from([7.0]).to_string(), "(7)");
    }

    #[test]
    fn approx_eq_rejects_dimension_mismatch() {
        let a = Point::from([1.0, 2.0]);
        let b = Point::from([1.0, 2.0, 0.0]);
        assert!(!a.approx_eq(&b, 1.0));
    }

    #[test]
    fn approx_eq_honours_tolerance() {
        let a = Point::from([1.0, 2.0]);
        assert!(a.approx_eq(&Point::from([1.0 + 1e-12, 2.0]), 1e-9));
        assert!(!a.approx_eq(&Point::from([1.1, 2.0]), 1e-9));
    }

    #[test]
    fn non_finite_detected() {
        assert!(Point::from([0.0, 1.0]).is_finite());
        assert!(!Point::from([f64::NAN, 1.0]).is_finite());
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(
            a in prop::collection::vec(-1e3f64..1e3, 3),
            b in prop::collection::vec(-1e3f64..1e3, 3),
        ) {
            let pa = Point::from(a);
            let pb = Point::from(b);
            prop_assert_eq!(pa.distance_sq(&pb), pb.distance_sq(&pa));
            prop_assert!(pa.distance_sq(&pa) == 0.0);
        }
    }
}
