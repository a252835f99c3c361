//! Geometric predicates for planar triangulations.
//!
//! The two predicates that drive every topological decision in the crate are
//! [`orientation`] (which side of a directed line a point lies on) and
//! [`in_circle`] (whether a point lies inside the circle through three
//! others). Both are evaluated with adaptive exact arithmetic through the
//! [`robust`] crate, so their signs are exact for every finite input and
//! consistent under permutation of the arguments. Point location relies on
//! that consistency to terminate.
//!
//! [`circumcircle`] is a derived, inexact construction used for diagnostics
//! and queries. It never decides topology.

use robust::{incircle, orient2d};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::geometry::point::Point;

/// Position of a point relative to a directed line, or equivalently the
/// winding of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The third point is right of the directed line (negative area).
    Clockwise,
    /// The three points are collinear (zero area).
    Collinear,
    /// The third point is left of the directed line (positive area).
    CounterClockwise,
}

impl Orientation {
    /// Classifies the sign of a signed area.
    #[must_use]
    pub fn from_signed_area(area: f64) -> Self {
        if area > 0.0 {
            Self::CounterClockwise
        } else if area < 0.0 {
            Self::Clockwise
        } else {
            Self::Collinear
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clockwise => write!(f, "CLOCKWISE"),
            Self::Collinear => write!(f, "COLLINEAR"),
            Self::CounterClockwise => write!(f, "COUNTERCLOCKWISE"),
        }
    }
}

/// Position of a point relative to a circumcircle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InCircle {
    /// The point is outside the circumcircle
    Outside,
    /// The point is exactly on the circumcircle
    Boundary,
    /// The point is inside the circumcircle
    Inside,
}

impl InCircle {
    /// Classifies the sign of an in-circle determinant.
    #[must_use]
    pub fn from_determinant(det: f64) -> Self {
        if det > 0.0 {
            Self::Inside
        } else if det < 0.0 {
            Self::Outside
        } else {
            Self::Boundary
        }
    }
}

impl fmt::Display for InCircle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outside => write!(f, "OUTSIDE"),
            Self::Boundary => write!(f, "BOUNDARY"),
            Self::Inside => write!(f, "INSIDE"),
        }
    }
}

/// Signed twice-area of the triangle `(a, b, c)`.
///
/// Positive when `c` lies left of the directed line `a → b`, negative when it
/// lies to the right, zero when the three points are collinear. The sign is
/// exact; the magnitude is an approximation of the true determinant.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::orientation;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(1.0, 0.0);
/// assert!(orientation(&a, &b, &Point::new(0.5, 1.0)) > 0.0);
/// assert!(orientation(&a, &b, &Point::new(0.5, -1.0)) < 0.0);
/// assert_eq!(orientation(&a, &b, &Point::new(2.0, 0.0)), 0.0);
/// ```
#[inline]
#[must_use]
pub fn orientation(a: &Point, b: &Point, c: &Point) -> f64 {
    orient2d(a.to_coord(), b.to_coord(), c.to_coord())
}

/// In-circle determinant of `d` against the circle through `a`, `b`, `c`.
///
/// With `a, b, c` in counter-clockwise order the result is positive iff `d`
/// lies strictly inside the circle, zero if it lies on it and negative
/// otherwise. For clockwise input the sign is reversed.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::in_circle;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(2.0, 0.0);
/// let c = Point::new(0.0, 2.0);
/// assert!(in_circle(&a, &b, &c, &Point::new(1.0, 1.0)) > 0.0);
/// assert_eq!(in_circle(&a, &b, &c, &Point::new(2.0, 2.0)), 0.0);
/// assert!(in_circle(&a, &b, &c, &Point::new(5.0, 5.0)) < 0.0);
/// ```
#[inline]
#[must_use]
pub fn in_circle(a: &Point, b: &Point, c: &Point, d: &Point) -> f64 {
    incircle(a.to_coord(), b.to_coord(), c.to_coord(), d.to_coord())
}

/// Classifies the winding of the triangle `(a, b, c)`.
#[must_use]
pub fn triangle_orientation(a: &Point, b: &Point, c: &Point) -> Orientation {
    Orientation::from_signed_area(orientation(a, b, c))
}

/// Classifies `d` against the circumcircle of the counter-clockwise triangle
/// `(a, b, c)`.
#[must_use]
pub fn in_circumcircle(a: &Point, b: &Point, c: &Point, d: &Point) -> InCircle {
    InCircle::from_determinant(in_circle(a, b, c, d))
}

/// Unsigned area of the triangle `(a, b, c)` in plain floating point.
#[must_use]
pub fn triangle_area(a: &Point, b: &Point, c: &Point) -> f64 {
    let cross = (b.x() - a.x()).mul_add(c.y() - a.y(), -((b.y() - a.y()) * (c.x() - a.x())));
    cross.abs() / 2.0
}

// =============================================================================
// CIRCUMCIRCLE
// =============================================================================

/// Errors from circumcircle construction.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CircumcircleError {
    /// The three points are collinear or coincident, so no circle passes
    /// through all of them.
    #[error("Points {a}, {b}, {c} are collinear; the circumcircle is undefined")]
    Degenerate {
        /// First point.
        a: Point,
        /// Second point.
        b: Point,
        /// Third point.
        c: Point,
    },
    /// The construction overflowed to a non-finite center.
    #[error("Circumcircle of {a}, {b}, {c} is not representable")]
    NonFinite {
        /// First point.
        a: Point,
        /// Second point.
        b: Point,
        /// Third point.
        c: Point,
    },
}

/// A circle through the three corners of a triangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circumcircle {
    /// Center of the circle.
    pub center: Point,
    /// Radius of the circle.
    pub radius: f64,
}

impl Circumcircle {
    /// Returns `true` if `point` is within the circle (floating-point test,
    /// boundary included).
    ///
    /// This is an approximate convenience; topological decisions use
    /// [`in_circle`].
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }
}

/// Computes the circumcircle of `(a, b, c)`.
///
/// Degeneracy is decided with the exact [`orientation`] predicate before
/// any division, so collinear input always produces an error.
///
/// # Errors
///
/// Returns [`CircumcircleError::Degenerate`] for collinear or coincident
/// points and [`CircumcircleError::NonFinite`] if the center overflows.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::circumcircle;
///
/// let circle = circumcircle(
///     &Point::new(0.0, 0.0),
///     &Point::new(2.0, 0.0),
///     &Point::new(0.0, 2.0),
/// )
/// .unwrap();
/// assert!((circle.center.x() - 1.0).abs() < 1e-12);
/// assert!((circle.radius - 2.0_f64.sqrt()).abs() < 1e-12);
///
/// assert!(circumcircle(
///     &Point::new(0.0, 0.0),
///     &Point::new(1.0, 0.0),
///     &Point::new(2.0, 0.0),
/// )
/// .is_err());
/// ```
pub fn circumcircle(a: &Point, b: &Point, c: &Point) -> Result<Circumcircle, CircumcircleError> {
    if orientation(a, b, c) == 0.0 {
        return Err(CircumcircleError::Degenerate {
            a: *a,
            b: *b,
            c: *c,
        });
    }

    let (bx, by) = (b.x() - a.x(), b.y() - a.y());
    let (cx, cy) = (c.x() - a.x(), c.y() - a.y());
    let b_len = bx.mul_add(bx, by * by);
    let c_len = cx.mul_add(cx, cy * cy);
    let det = 2.0 * bx.mul_add(cy, -(by * cx));

    let ux = cy.mul_add(b_len, -(by * c_len)) / det;
    let uy = bx.mul_add(c_len, -(cx * b_len)) / det;

    let center = Point::new(a.x() + ux, a.y() + uy);
    let radius = ux.hypot(uy);
    if !center.is_finite() || !radius.is_finite() {
        return Err(CircumcircleError::NonFinite {
            a: *a,
            b: *b,
            c: *c,
        });
    }

    Ok(Circumcircle { center, radius })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn orientation_signs() {
        let a = p(0.0, 0.0);
        let b = p(1.0, 0.0);
        assert_eq!(
            triangle_orientation(&a, &b, &p(0.0, 1.0)),
            Orientation::CounterClockwise
        );
        assert_eq!(
            triangle_orientation(&a, &b, &p(0.0, -1.0)),
            Orientation::Clockwise
        );
        assert_eq!(
            triangle_orientation(&a, &b, &p(-3.0, 0.0)),
            Orientation::Collinear
        );
    }

    #[test]
    fn orientation_is_consistent_under_permutation() {
        // Nearly collinear points where naive evaluation is unreliable.
        let a = p(0.5, 0.5);
        let b = p(12.0, 12.0);
        let c = p(24.0, 24.000_000_000_000_004);

        let abc = orientation(&a, &b, &c);
        let bca = orientation(&b, &c, &a);
        let cab = orientation(&c, &a, &b);
        let bac = orientation(&b, &a, &c);

        assert_eq!(abc.signum(), bca.signum());
        assert_eq!(abc.signum(), cab.signum());
        assert_eq!(abc.signum(), -bac.signum());
    }

    #[test]
    fn orientation_exact_on_collinear_grid() {
        // Every point on y = x is exactly collinear, however it rounds.
        for i in 0..10 {
            let t = f64::from(i) * 0.1;
            assert_eq!(orientation(&p(0.1, 0.1), &p(0.3, 0.3), &p(t, t)), 0.0);
        }
    }

    #[test]
    fn in_circle_classification() {
        let a = p(0.0, 0.0);
        let b = p(1.0, 0.0);
        let c = p(0.0, 1.0);
        assert_eq!(in_circumcircle(&a, &b, &c, &p(0.5, 0.5)), InCircle::Inside);
        assert_eq!(in_circumcircle(&a, &b, &c, &p(1.0, 1.0)), InCircle::Boundary);
        assert_eq!(in_circumcircle(&a, &b, &c, &p(2.0, 2.0)), InCircle::Outside);

        // Clockwise input reverses the sign.
        assert!(in_circle(&a, &c, &b, &p(0.5, 0.5)) < 0.0);
    }

    #[test]
    fn in_circle_unit_square_is_cocircular() {
        let sq = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)];
        assert_eq!(in_circle(&sq[0], &sq[1], &sq[2], &sq[3]), 0.0);
        assert_eq!(in_circle(&sq[1], &sq[2], &sq[3], &sq[0]), 0.0);
    }

    #[test]
    fn circumcircle_of_right_triangle() {
        let circle = circumcircle(&p(0.0, 0.0), &p(4.0, 0.0), &p(0.0, 3.0)).unwrap();
        assert_relative_eq!(circle.center.x(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(circle.center.y(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(circle.radius, 2.5, epsilon = 1e-12);
        assert!(circle.contains(&p(2.0, 1.5)));
        assert!(!circle.contains(&p(10.0, 10.0)));
    }

    #[test]
    fn circumcircle_rejects_degenerate_triangles() {
        assert!(matches!(
            circumcircle(&p(0.0, 0.0), &p(1.0, 1.0), &p(2.0, 2.0)),
            Err(CircumcircleError::Degenerate { .. })
        ));
        assert!(matches!(
            circumcircle(&p(1.0, 1.0), &p(1.0, 1.0), &p(2.0, 0.0)),
            Err(CircumcircleError::Degenerate { .. })
        ));
    }

    #[test]
    fn triangle_area_is_unsigned() {
        assert_relative_eq!(triangle_area(&p(0.0, 0.0), &p(2.0, 0.0), &p(0.0, 2.0)), 2.0);
        assert_relative_eq!(triangle_area(&p(0.0, 0.0), &p(0.0, 2.0), &p(2.0, 0.0)), 2.0);
    }

    #[test]
    fn display_impls() {
        assert_eq!(Orientation::Collinear.to_string(), "COLLINEAR");
        assert_eq!(InCircle::Inside.to_string(), "INSIDE");
    }
}
