//! Edge extraction.
//!
//! Edges are not stored; they are derived from the triangle set. Two
//! identifiers are provided:
//!
//! - [`EdgeKey`]: a canonical pair of [`VertexKey`]s, covering every edge
//!   including those touching a sentinel;
//! - [`Edge`]: a pair of real point indices (the first inserted point is
//!   `0`), covering only edges between real points. This is the form
//!   consumers of the triangulation usually want.
//!
//! ## Determinism
//!
//! `EdgeKey` ordering follows the internal slotmap key order and is not
//! meaningful across processes. `Edge` ordering follows insertion order and
//! is deterministic.

use serde::{Deserialize, Serialize};
use slotmap::Key;

use crate::core::collections::{FastHashSet, VertexKey, fast_hash_set_with_capacity};
use crate::core::triangulation::Triangulation;
use crate::geometry::kernel::Kernel;

/// Canonical identifier for an undirected edge over vertex keys.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::collections::VertexKey;
/// use planar_delaunay::core::edge::EdgeKey;
/// use slotmap::KeyData;
///
/// let a = VertexKey::from(KeyData::from_ffi(1));
/// let b = VertexKey::from(KeyData::from_ffi(2));
/// assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    v0: VertexKey,
    v1: VertexKey,
}

impl EdgeKey {
    /// Creates a canonical edge key; endpoints are ordered by raw key value.
    #[must_use]
    pub fn new(a: VertexKey, b: VertexKey) -> Self {
        if a.data().as_ffi() <= b.data().as_ffi() {
            Self { v0: a, v1: b }
        } else {
            Self { v0: b, v1: a }
        }
    }

    /// The first (canonical) endpoint.
    #[inline]
    #[must_use]
    pub const fn v0(self) -> VertexKey {
        self.v0
    }

    /// The second (canonical) endpoint.
    #[inline]
    #[must_use]
    pub const fn v1(self) -> VertexKey {
        self.v1
    }

    /// Both endpoints.
    #[inline]
    #[must_use]
    pub const fn endpoints(self) -> (VertexKey, VertexKey) {
        (self.v0, self.v1)
    }

    /// Returns `true` if `v` is an endpoint.
    #[must_use]
    pub fn contains(self, v: VertexKey) -> bool {
        self.v0 == v || self.v1 == v
    }
}

impl From<(VertexKey, VertexKey)> for EdgeKey {
    #[inline]
    fn from((a, b): (VertexKey, VertexKey)) -> Self {
        Self::new(a, b)
    }
}

/// An undirected edge between two real input points, by point index.
///
/// Always stored with `a < b`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    /// Smaller point index.
    pub a: usize,
    /// Larger point index.
    pub b: usize,
}

impl Edge {
    /// Creates an edge with its endpoints in ascending order.
    #[must_use]
    pub const fn new(i: usize, j: usize) -> Self {
        if i <= j {
            Self { a: i, b: j }
        } else {
            Self { a: j, b: i }
        }
    }
}

impl From<Edge> for (usize, usize) {
    fn from(edge: Edge) -> Self {
        (edge.a, edge.b)
    }
}

/// Every edge of the triangulation, sentinel edges included, sorted.
#[must_use]
pub fn all_edges<K: Kernel>(tri: &Triangulation<K>) -> Vec<EdgeKey> {
    let mut seen: FastHashSet<EdgeKey> = fast_hash_set_with_capacity(tri.triangles.len() * 2);
    for triangle in tri.triangles.values() {
        for e in 0..3 {
            seen.insert(triangle.edge(e).into());
        }
    }
    let mut edges: Vec<EdgeKey> = seen.into_iter().collect();
    edges.sort_unstable();
    edges
}

/// Edges between real points, renumbered to point indices, de-duplicated
/// and sorted.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::edge::Edge;
/// use planar_delaunay::prelude::*;
///
/// let tri = Triangulation::from_points(&[
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(0.0, 1.0),
/// ])
/// .unwrap();
/// assert_eq!(tri.edges(), vec![Edge::new(0, 1), Edge::new(0, 2), Edge::new(1, 2)]);
/// ```
#[must_use]
pub fn edges<K: Kernel>(tri: &Triangulation<K>) -> Vec<Edge> {
    let mut seen: FastHashSet<Edge> = fast_hash_set_with_capacity(tri.triangles.len() * 2);
    for triangle in tri.triangles.values() {
        for e in 0..3 {
            let (from, to) = triangle.edge(e);
            if let (Some(i), Some(j)) = (tri.point_index(from), tri.point_index(to)) {
                seen.insert(Edge::new(i, j));
            }
        }
    }
    let mut edges: Vec<Edge> = seen.into_iter().collect();
    edges.sort_unstable();
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collections::StorageMap;
    use crate::geometry::point::Point;

    #[test]
    fn edge_key_is_canonical() {
        let mut vertices: StorageMap<VertexKey, ()> = StorageMap::with_key();
        let a = vertices.insert(());
        let b = vertices.insert(());

        let e1 = EdgeKey::new(a, b);
        let e2 = EdgeKey::from((b, a));
        assert_eq!(e1, e2);
        assert!(e1.v0().data().as_ffi() <= e1.v1().data().as_ffi());
        assert_eq!(e1.endpoints(), (e1.v0(), e1.v1()));
        assert!(e1.contains(a) && e1.contains(b));
    }

    #[test]
    fn edge_orders_endpoints() {
        assert_eq!(Edge::new(5, 2), Edge { a: 2, b: 5 });
        let pair: (usize, usize) = Edge::new(1, 0).into();
        assert_eq!(pair, (0, 1));
        assert_eq!(
            serde_json::to_string(&Edge::new(3, 1)).unwrap(),
            r#"{"a":1,"b":3}"#
        );
    }

    #[test]
    fn edge_counts_follow_euler() {
        let tri = Triangulation::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 3.0),
            Point::new(0.0, 3.0),
            Point::new(1.0, 1.0),
        ])
        .unwrap();

        // V - E + F = 1 over the bounded faces of the full triangulation.
        let v = tri.number_of_vertices() + 3;
        let e = all_edges(&tri).len();
        let f = tri.number_of_triangles();
        assert_eq!(v + f, e + 1);

        let real = edges(&tri);
        assert!(real.windows(2).all(|w| w[0] < w[1]));
        assert!(real.iter().all(|edge| edge.a < edge.b && edge.b < 5));
    }
}
