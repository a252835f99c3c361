//! Geometric kernel abstraction.
//!
//! The [`Kernel`] trait is the single seam through which the triangulation
//! evaluates geometry. The triangulation itself is purely combinatorial; all
//! sign decisions go through the kernel it was built with.
//!
//! [`RobustKernel`] is the default and evaluates both predicates with
//! adaptive exact arithmetic. [`FastKernel`] uses plain floating point and is
//! only suitable for well-conditioned input where speed matters more than
//! guaranteed termination on near-degenerate configurations.

use std::fmt::Debug;

use crate::geometry::point::Point;
use crate::geometry::predicates::{in_circle, orientation};

/// Geometric kernel trait defining the predicates used by triangulation
/// algorithms.
///
/// # Examples
///
/// ```
/// use planar_delaunay::geometry::kernel::{Kernel, RobustKernel};
/// use planar_delaunay::geometry::point::Point;
///
/// let kernel = RobustKernel::new();
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(1.0, 0.0);
/// let c = Point::new(0.5, 1.0);
///
/// assert!(kernel.orientation(&a, &b, &c) > 0.0);
/// assert!(kernel.in_circle(&a, &b, &c, &Point::new(0.5, 0.3)) > 0.0);
/// ```
pub trait Kernel: Clone + Default + Debug {
    /// Signed orientation of `(a, b, c)`: positive for counter-clockwise,
    /// negative for clockwise, zero for collinear.
    fn orientation(&self, a: &Point, b: &Point, c: &Point) -> f64;

    /// In-circle determinant: positive iff `d` lies strictly inside the
    /// circumcircle of the counter-clockwise triangle `(a, b, c)`.
    fn in_circle(&self, a: &Point, b: &Point, c: &Point, d: &Point) -> f64;

    /// Returns `true` if `(a, b, c)` is strictly counter-clockwise.
    #[inline]
    fn is_counter_clockwise(&self, a: &Point, b: &Point, c: &Point) -> bool {
        self.orientation(a, b, c) > 0.0
    }
}

// =============================================================================
// ROBUST KERNEL
// =============================================================================

/// Kernel with exact predicate signs (adaptive precision).
///
/// This is the default kernel for [`Triangulation`](crate::core::triangulation::Triangulation).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RobustKernel;

impl RobustKernel {
    /// Creates a new robust kernel.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Kernel for RobustKernel {
    #[inline]
    fn orientation(&self, a: &Point, b: &Point, c: &Point) -> f64 {
        orientation(a, b, c)
    }

    #[inline]
    fn in_circle(&self, a: &Point, b: &Point, c: &Point, d: &Point) -> f64 {
        in_circle(a, b, c, d)
    }
}

// =============================================================================
// FAST KERNEL
// =============================================================================

/// Kernel evaluating the determinants directly in `f64`.
///
/// Signs may be wrong for nearly degenerate input, which can make point
/// location cycle. Such failures surface as
/// [`LocateError::CycleDetected`](crate::core::algorithms::locate::LocateError::CycleDetected)
/// rather than as an infinite loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FastKernel;

impl FastKernel {
    /// Creates a new fast kernel.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Kernel for FastKernel {
    #[inline]
    fn orientation(&self, a: &Point, b: &Point, c: &Point) -> f64 {
        let acx = a.x() - c.x();
        let bcx = b.x() - c.x();
        let acy = a.y() - c.y();
        let bcy = b.y() - c.y();
        acx.mul_add(bcy, -(acy * bcx))
    }

    fn in_circle(&self, a: &Point, b: &Point, c: &Point, d: &Point) -> f64 {
        let adx = a.x() - d.x();
        let ady = a.y() - d.y();
        let bdx = b.x() - d.x();
        let bdy = b.y() - d.y();
        let cdx = c.x() - d.x();
        let cdy = c.y() - d.y();

        let alift = adx.mul_add(adx, ady * ady);
        let blift = bdx.mul_add(bdx, bdy * bdy);
        let clift = cdx.mul_add(cdx, cdy * cdy);

        let bc = bdx.mul_add(cdy, -(bdy * cdx));
        let ca = cdx.mul_add(ady, -(cdy * adx));
        let ab = adx.mul_add(bdy, -(ady * bdx));

        alift.mul_add(bc, blift.mul_add(ca, clift * ab))
    }
}
