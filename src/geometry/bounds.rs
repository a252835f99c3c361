//! Axis-aligned bounding boxes and sentinel triangle sizing.

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point;

/// An axis-aligned bounding box.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::bounds::BoundingBox;
/// use planar_delaunay::geometry::point::Point;
///
/// let bbox = BoundingBox::from_points(&[
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 1.0),
///     Point::new(2.0, 3.0),
/// ])
/// .unwrap();
/// assert_eq!(bbox.min(), Point::new(0.0, 0.0));
/// assert_eq!(bbox.max(), Point::new(4.0, 3.0));
/// assert_eq!(bbox.width(), 4.0);
/// assert_eq!(bbox.height(), 3.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    min: Point,
    max: Point,
}

impl Default for BoundingBox {
    /// The unit square `[0, 1] × [0, 1]`.
    fn default() -> Self {
        Self::unit()
    }
}

impl BoundingBox {
    /// Creates a bounding box from its corners.
    ///
    /// The corners are taken as given; use [`is_valid`](Self::is_valid) to
    /// check that they are finite and ordered.
    #[must_use]
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// The unit square `[0, 1] × [0, 1]`.
    #[must_use]
    pub const fn unit() -> Self {
        Self::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0))
    }

    /// Smallest box containing every point, or `None` for an empty slice.
    ///
    /// Non-finite points are included as-is, which makes the result invalid.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bbox = Self::new(*first, *first);
        for point in rest {
            bbox.expand(point);
        }
        Some(bbox)
    }

    /// Lower-left corner.
    #[must_use]
    pub const fn min(&self) -> Point {
        self.min
    }

    /// Upper-right corner.
    #[must_use]
    pub const fn max(&self) -> Point {
        self.max
    }

    /// Extent along x.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x() - self.min.x()
    }

    /// Extent along y.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y() - self.min.y()
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.min.x().midpoint(self.max.x()),
            self.min.y().midpoint(self.max.y()),
        )
    }

    /// Length of the diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    /// Returns `true` if both corners are finite and `min <= max` on each axis.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x() <= self.max.x()
            && self.min.y() <= self.max.y()
    }

    /// Returns `true` if `point` lies in the closed box.
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        (self.min.x()..=self.max.x()).contains(&point.x())
            && (self.min.y()..=self.max.y()).contains(&point.y())
    }

    /// Grows the box to include `point`.
    pub fn expand(&mut self, point: &Point) {
        self.min = Point::new(self.min.x().min(point.x()), self.min.y().min(point.y()));
        self.max = Point::new(self.max.x().max(point.x()), self.max.y().max(point.y()));
    }
}

/// Corners of the sentinel triangle enclosing `bbox`, in counter-clockwise
/// order.
///
/// The triangle is equilateral, centered on the box, with inradius
/// `max(diagonal, 1) * scale`. Any `scale >= 1` places every point of the box
/// strictly inside it.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::bounds::{BoundingBox, sentinel_triangle};
/// use planar_delaunay::geometry::predicates::orientation;
///
/// let bbox = BoundingBox::unit();
/// let [a, b, c] = sentinel_triangle(&bbox, 100.0);
/// assert!(orientation(&a, &b, &c) > 0.0);
/// assert!(orientation(&a, &b, &bbox.max()) > 0.0);
/// ```
#[must_use]
pub fn sentinel_triangle(bbox: &BoundingBox, scale: f64) -> [Point; 3] {
    let center = bbox.center();
    let r = bbox.diagonal().max(1.0) * scale;
    let half_base = 3.0_f64.sqrt() * r;
    [
        Point::new(center.x() - half_base, center.y() - r),
        Point::new(center.x() + half_base, center.y() - r),
        Point::new(center.x(), 2.0f64.mul_add(r, center.y())),
    ]
}
