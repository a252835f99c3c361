//! Data and operations on 2D points.
//!
//! A [`Point`] is an immutable pair of `f64` coordinates. Points are plain
//! values: they carry no identity and are copied freely. Identity lives on
//! [`Vertex`](crate::core::vertex::Vertex), which wraps a point once it has
//! been inserted into a triangulation.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during coordinate validation.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::{CoordinateValidationError, Point};
///
/// let err = Point::new(f64::NAN, 1.0).validate().unwrap_err();
/// assert!(matches!(
///     err,
///     CoordinateValidationError::InvalidCoordinate { coordinate_index: 0, .. }
/// ));
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CoordinateValidationError {
    /// A coordinate value is invalid (NaN or infinite).
    #[error("Invalid coordinate at index {coordinate_index}: {coordinate_value}")]
    InvalidCoordinate {
        /// Index of the invalid coordinate (0 = x, 1 = y).
        coordinate_index: usize,
        /// Value of the invalid coordinate, as a string.
        coordinate_value: String,
    },
}

// =============================================================================
// POINT STRUCT DEFINITION
// =============================================================================

/// A point in the plane.
///
/// The coordinates are private so that a point cannot be modified after it
/// has been created.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::Point;
///
/// let p = Point::new(1.0, 2.0);
/// assert_eq!(p.coords(), [1.0, 2.0]);
/// assert_eq!(Point::from([1.0, 2.0]), p);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The x coordinate.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// The y coordinate.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Returns both coordinates as an array.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Returns `true` if both coordinates are finite.
    #[inline]
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Checks that both coordinates are finite.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateValidationError::InvalidCoordinate`] for the first
    /// coordinate that is NaN or infinite.
    pub fn validate(&self) -> Result<(), CoordinateValidationError> {
        for (coordinate_index, value) in self.coords().into_iter().enumerate() {
            if !value.is_finite() {
                return Err(CoordinateValidationError::InvalidCoordinate {
                    coordinate_index,
                    coordinate_value: format!("{value:?}"),
                });
            }
        }
        Ok(())
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Centroid of three points.
    #[must_use]
    pub fn centroid(a: &Self, b: &Self, c: &Self) -> Self {
        Self::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
    }

    /// Returns `true` if both coordinates have identical bit patterns.
    ///
    /// Unlike `==`, this distinguishes `0.0` from `-0.0` and treats NaN as
    /// equal to itself, which makes it suitable for exact de-duplication.
    #[inline]
    #[must_use]
    pub const fn bitwise_eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }

    #[inline]
    pub(crate) const fn to_coord(self) -> robust::Coord<f64> {
        robust::Coord {
            x: self.x,
            y: self.y,
        }
    }
}

// =============================================================================
// TRAIT IMPLEMENTATIONS
// =============================================================================

impl From<[f64; 2]> for Point {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    #[inline]
    fn from(point: Point) -> Self {
        point.coords()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_accessors_and_conversions() {
        let p = Point::new(3.0, -4.5);
        assert_relative_eq!(p.x(), 3.0);
        assert_relative_eq!(p.y(), -4.5);
        assert_eq!(p.coords(), [3.0, -4.5]);

        let q: Point = (3.0, -4.5).into();
        assert_eq!(p, q);

        let arr: [f64; 2] = p.into();
        assert_eq!(arr, [3.0, -4.5]);
    }

    #[test]
    fn point_validation_rejects_non_finite_coordinates() {
        assert!(Point::new(0.0, 0.0).validate().is_ok());

        let err = Point::new(1.0, f64::INFINITY).validate().unwrap_err();
        assert_eq!(
            err,
            CoordinateValidationError::InvalidCoordinate {
                coordinate_index: 1,
                coordinate_value: "inf".to_string(),
            }
        );

        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(Point::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn point_distance_and_centroid() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_relative_eq!(a.distance(&b), 5.0);
        assert_relative_eq!(a.distance_squared(&b), 25.0);

        let c = Point::centroid(&a, &Point::new(3.0, 0.0), &Point::new(0.0, 3.0));
        assert_relative_eq!(c.x(), 1.0);
        assert_relative_eq!(c.y(), 1.0);
    }

    #[test]
    fn point_bitwise_equality() {
        assert!(Point::new(1.0, 2.0).bitwise_eq(&Point::new(1.0, 2.0)));
        assert!(!Point::new(0.0, 0.0).bitwise_eq(&Point::new(-0.0, 0.0)));
        assert!(Point::new(f64::NAN, 0.0).bitwise_eq(&Point::new(f64::NAN, 0.0)));
    }

    #[test]
    fn point_serialization_roundtrip() {
        let p = Point::new(1.25, -2.5);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"x":1.25,"y":-2.5}"#);
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn point_display() {
        assert_eq!(Point::new(1.5, -2.0).to_string(), "(1.5, -2)");
    }
}
