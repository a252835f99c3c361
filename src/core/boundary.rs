//! Convex hull queries.
//!
//! The sentinel triangle encloses every real point, so the convex hull of
//! the real points is not stored explicitly. A triangle is inside the hull
//! when none of its corners is a sentinel; the hull boundary consists of
//! the inside triangles that border an outside one.

use crate::core::collections::TriangleKey;
use crate::core::edge::Edge;
use crate::core::triangulation::Triangulation;
use crate::geometry::kernel::Kernel;

/// Hull classification of the triangles of a triangulation.
///
/// The sentinels sit at a finite distance, so a real triangle whose
/// circumcircle would contain a sentinel is never formed. Nearly collinear
/// points along the hull can therefore stay connected only through sentinel
/// triangles, and [`hull_edges`](Self::hull_edges) then misses the hull
/// edges there. A larger `sentinel_scale` pushes this out to flatter input.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::prelude::*;
///
/// let tri = Triangulation::from_points(&[
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(0.0, 10.0),
/// ])
/// .unwrap();
///
/// assert_eq!(tri.interior_triangles().len(), 2);
/// assert_eq!(tri.hull_boundary_triangles().len(), 2);
/// assert_eq!(tri.hull_edges().len(), 4);
/// ```
pub trait BoundaryAnalysis {
    /// Returns `true` if no corner of `triangle` is a sentinel. Missing
    /// triangles are not inside.
    fn is_inside_hull(&self, triangle: TriangleKey) -> bool;

    /// Returns `true` if `triangle` is inside the hull and at least one
    /// neighbor is missing or outside it.
    fn is_on_hull_boundary(&self, triangle: TriangleKey) -> bool;

    /// Every triangle inside the hull.
    fn interior_triangles(&self) -> Vec<TriangleKey>;

    /// Every triangle on the hull boundary.
    fn hull_boundary_triangles(&self) -> Vec<TriangleKey>;

    /// Edges of the boundary between real and sentinel triangles, by point
    /// index, sorted. This is the convex hull of the real points except where
    /// the hull is too flat for the sentinels to clear (see the trait docs).
    fn hull_edges(&self) -> Vec<Edge>;
}

impl<K: Kernel> BoundaryAnalysis for Triangulation<K> {
    fn is_inside_hull(&self, triangle: TriangleKey) -> bool {
        self.triangles
            .get(triangle)
            .is_some_and(|t| t.vertices().iter().all(|&v| !self.is_sentinel(v)))
    }

    fn is_on_hull_boundary(&self, triangle: TriangleKey) -> bool {
        self.is_inside_hull(triangle)
            && self.triangles[triangle]
                .neighbors()
                .iter()
                .any(|n| n.is_none_or(|n| !self.is_inside_hull(n)))
    }

    fn interior_triangles(&self) -> Vec<TriangleKey> {
        self.triangles
            .keys()
            .filter(|&t| self.is_inside_hull(t))
            .collect()
    }

    fn hull_boundary_triangles(&self) -> Vec<TriangleKey> {
        self.triangles
            .keys()
            .filter(|&t| self.is_on_hull_boundary(t))
            .collect()
    }

    fn hull_edges(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        for t in self.hull_boundary_triangles() {
            let triangle = &self.triangles[t];
            for e in 0..3 {
                if triangle
                    .neighbor(e)
                    .is_none_or(|n| !self.is_inside_hull(n))
                {
                    let (from, to) = triangle.edge(e);
                    if let (Some(i), Some(j)) = (self.point_index(from), self.point_index(to)) {
                        edges.push(Edge::new(i, j));
                    }
                }
            }
        }
        edges.sort_unstable();
        edges
    }
}
