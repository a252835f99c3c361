//! Point location by triangle walking.
//!
//! Starting from a hint triangle, the walk repeatedly tests the query point
//! against the edges of the current triangle and steps across an edge the
//! point lies strictly outside of, until no such edge remains. Visited
//! triangles are tracked so that a topological inconsistency surfaces as
//! [`LocateError::CycleDetected`] instead of looping forever.
//!
//! # References
//!
//! - O. Devillers, S. Pion, and M. Teillaud, "Walking in a Triangulation",
//!   International Journal of Foundations of Computer Science, 2001.
//! - C. L. Lawson, "Software for C1 surface interpolation", 1977.

use crate::core::collections::{TriangleKey, TriangleKeySet};
use crate::core::triangle::{next, prev};
use crate::core::triangulation::Triangulation;
use crate::geometry::kernel::Kernel;
use crate::geometry::point::Point;

/// Where a point lies relative to the triangle the walk stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateResult {
    /// Strictly inside the triangle.
    Inside(TriangleKey),
    /// On the edge opposite the given corner, strictly between its endpoints.
    OnEdge(TriangleKey, u8), // triangle, edge index
    /// Coincident with the given corner.
    OnVertex(TriangleKey, u8), // triangle, corner index
}

impl LocateResult {
    /// The triangle the walk stopped at.
    #[must_use]
    pub const fn triangle(&self) -> TriangleKey {
        match *self {
            Self::Inside(t) | Self::OnEdge(t, _) | Self::OnVertex(t, _) => t,
        }
    }
}

/// Error during point location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocateError {
    /// The walk stepped across an edge with no neighbor: the point lies
    /// outside the sentinel triangle.
    #[error("Point {point} is outside the triangulation (left through triangle {triangle:?})")]
    OutsideTriangulation {
        /// The query point.
        point: Point,
        /// Last triangle visited.
        triangle: TriangleKey,
    },

    /// The walk revisited a triangle.
    #[error("Cycle detected after {steps} steps at triangle {triangle:?}")]
    CycleDetected {
        /// Triangles visited before the repeat.
        steps: usize,
        /// The revisited triangle.
        triangle: TriangleKey,
    },

    /// A triangle or one of its corners is missing from the arena, or its
    /// corners are collinear.
    #[error("Invalid triangle reference: {triangle:?}")]
    InvalidTriangle {
        /// The offending key.
        triangle: TriangleKey,
    },
}

/// A completed walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walk {
    /// Where the point was found.
    pub result: LocateResult,
    /// Triangles visited, including the final one.
    pub steps: usize,
    /// Orientation predicates evaluated.
    pub orientation_tests: usize,
}

/// Diagnostic record of the triangles visited by a walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkTrace {
    /// Visited triangles, in order.
    pub visited: Vec<TriangleKey>,
    /// Centroid of each visited triangle.
    pub centers: Vec<Point>,
}

/// Locates `point`, starting at `hint` if it is a live triangle and at the
/// most recently created triangle otherwise.
///
/// # Errors
///
/// Returns [`LocateError`] if the point is outside the triangulation or the
/// adjacency is inconsistent.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::algorithms::locate::{LocateResult, locate};
/// use planar_delaunay::prelude::*;
///
/// let tri = Triangulation::from_points(&[
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 0.0),
///     Point::new(0.0, 4.0),
/// ])
/// .unwrap();
///
/// let walk = locate(&tri, &Point::new(1.0, 1.0), None).unwrap();
/// assert!(matches!(walk.result, LocateResult::Inside(_)));
/// assert!(walk.steps >= 1);
///
/// let walk = locate(&tri, &Point::new(0.0, 4.0), None).unwrap();
/// assert!(matches!(walk.result, LocateResult::OnVertex(..)));
/// ```
pub fn locate<K: Kernel>(
    tri: &Triangulation<K>,
    point: &Point,
    hint: Option<TriangleKey>,
) -> Result<Walk, LocateError> {
    walk(tri, point, hint, None)
}

/// Like [`locate`], also recording every visited triangle and its centroid.
///
/// # Errors
///
/// Same as [`locate`].
pub fn locate_with_trace<K: Kernel>(
    tri: &Triangulation<K>,
    point: &Point,
    hint: Option<TriangleKey>,
) -> Result<(Walk, WalkTrace), LocateError> {
    let mut trace = WalkTrace::default();
    let walk = walk(tri, point, hint, Some(&mut trace))?;
    Ok((walk, trace))
}

fn walk<K: Kernel>(
    tri: &Triangulation<K>,
    point: &Point,
    hint: Option<TriangleKey>,
    mut trace: Option<&mut WalkTrace>,
) -> Result<Walk, LocateError> {
    let mut current = match hint {
        Some(key) if tri.contains_triangle(key) => key,
        _ => tri.last_triangle,
    };

    let mut visited = TriangleKeySet::default();
    let mut orientation_tests = 0;

    loop {
        if !visited.insert(current) {
            return Err(LocateError::CycleDetected {
                steps: visited.len(),
                triangle: current,
            });
        }

        let corners = tri
            .triangle_points(current)
            .ok_or(LocateError::InvalidTriangle { triangle: current })?;

        if let Some(trace) = trace.as_mut() {
            trace.visited.push(current);
            trace
                .centers
                .push(Point::centroid(&corners[0], &corners[1], &corners[2]));
        }

        // Positive: the point is on the same side of edge e as corner e.
        let side = |e: usize| {
            tri.kernel
                .orientation(&corners[next(e)], &corners[prev(e)], point)
        };

        let o0 = side(0);
        let o1 = side(1);
        orientation_tests += 2;

        let exit = if o0 < 0.0 && o1 < 0.0 {
            if o0 <= o1 { 0 } else { 1 }
        } else {
            let sides = [o0, o1, side(2)];
            orientation_tests += 1;

            let (e, min) = sides
                .iter()
                .copied()
                .enumerate()
                .fold((0, f64::INFINITY), |best, (e, o)| if o < best.1 { (e, o) } else { best });

            if min >= 0.0 {
                let result = classify(current, sides)?;
                return Ok(Walk {
                    result,
                    steps: visited.len(),
                    orientation_tests,
                });
            }
            e
        };

        current = tri
            .triangle(current)
            .ok_or(LocateError::InvalidTriangle { triangle: current })?
            .neighbor(exit)
            .ok_or(LocateError::OutsideTriangulation {
                point: *point,
                triangle: current,
            })?;
    }
}

/// Turns non-negative edge orientations into a [`LocateResult`].
fn classify(triangle: TriangleKey, sides: [f64; 3]) -> Result<LocateResult, LocateError> {
    let mut zeros = sides
        .iter()
        .enumerate()
        .filter(|&(_, &o)| o == 0.0)
        .map(|(e, _)| e);

    match (zeros.next(), zeros.next(), zeros.next()) {
        (None, _, _) => Ok(LocateResult::Inside(triangle)),
        (Some(e), None, _) => Ok(LocateResult::OnEdge(triangle, edge_u8(e))),
        // The point lies on both edges meeting at the remaining corner.
        (Some(e1), Some(e2), None) => Ok(LocateResult::OnVertex(triangle, edge_u8(3 - e1 - e2))),
        // All three zero: the triangle itself is degenerate.
        (Some(_), Some(_), Some(_)) => Err(LocateError::InvalidTriangle { triangle }),
    }
}

#[expect(clippy::cast_possible_truncation, reason = "triangle indices are 0..3")]
const fn edge_u8(e: usize) -> u8 {
    e as u8
}
