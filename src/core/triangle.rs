//! Triangles and their adjacency.
//!
//! A [`Triangle`] stores three vertex keys in counter-clockwise order and
//! three optional neighbor keys. Neighbor `i` shares the edge opposite
//! corner `i`, which runs from corner `i + 1` to corner `i + 2` (indices
//! mod 3). Two adjacent triangles traverse their shared edge in opposite
//! directions.
//!
//! ```text
//!            v2
//!            /\
//!   n1      /  \      n0
//!          /    \
//!        v0------v1
//!            n2
//! ```

#![forbid(unsafe_code)]

use std::sync::OnceLock;

use thiserror::Error;

use crate::core::collections::{TriangleKey, VertexKey};
use crate::geometry::predicates::Circumcircle;

/// Errors from triangle construction.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TriangleValidationError {
    /// The same vertex appears at two corners.
    #[error("Triangle has duplicate vertex {vertex:?} at corners {first} and {second}")]
    DuplicateVertex {
        /// The repeated vertex.
        vertex: VertexKey,
        /// First corner holding it.
        first: usize,
        /// Second corner holding it.
        second: usize,
    },
}

/// Returns `(i + 1) % 3`.
#[inline]
#[must_use]
pub const fn next(i: usize) -> usize {
    if i == 2 { 0 } else { i + 1 }
}

/// Returns `(i + 2) % 3`.
#[inline]
#[must_use]
pub const fn prev(i: usize) -> usize {
    if i == 0 { 2 } else { i - 1 }
}

/// A triangle in the triangulation.
///
/// Triangles are created and rewritten only by the owning triangulation;
/// callers read them through accessors.
#[derive(Clone, Debug)]
pub struct Triangle {
    vertices: [VertexKey; 3],
    neighbors: [Option<TriangleKey>; 3],
    circumcircle: OnceLock<Option<Circumcircle>>,
}

impl Triangle {
    /// Creates a triangle with no neighbors.
    ///
    /// Orientation is not checked here; the triangulation checks it with its
    /// kernel.
    ///
    /// # Errors
    ///
    /// Returns [`TriangleValidationError::DuplicateVertex`] if two corners are
    /// the same vertex.
    pub fn new(vertices: [VertexKey; 3]) -> Result<Self, TriangleValidationError> {
        for first in 0..3 {
            for second in (first + 1)..3 {
                if vertices[first] == vertices[second] {
                    return Err(TriangleValidationError::DuplicateVertex {
                        vertex: vertices[first],
                        first,
                        second,
                    });
                }
            }
        }
        Ok(Self {
            vertices,
            neighbors: [None; 3],
            circumcircle: OnceLock::new(),
        })
    }

    /// The three corners, counter-clockwise.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> &[VertexKey; 3] {
        &self.vertices
    }

    /// Corner `i` (mod 3).
    #[inline]
    #[must_use]
    pub const fn vertex(&self, i: usize) -> VertexKey {
        self.vertices[i % 3]
    }

    /// The three neighbor slots.
    #[inline]
    #[must_use]
    pub const fn neighbors(&self) -> &[Option<TriangleKey>; 3] {
        &self.neighbors
    }

    /// Neighbor across the edge opposite corner `i` (mod 3).
    #[inline]
    #[must_use]
    pub const fn neighbor(&self, i: usize) -> Option<TriangleKey> {
        self.neighbors[i % 3]
    }

    /// Position of `vertex` among the corners.
    #[must_use]
    pub fn vertex_index(&self, vertex: VertexKey) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    /// Returns `true` if `vertex` is a corner.
    #[must_use]
    pub fn contains_vertex(&self, vertex: VertexKey) -> bool {
        self.vertices.contains(&vertex)
    }

    /// The directed edge opposite corner `e`: `(v[e+1], v[e+2])`.
    #[inline]
    #[must_use]
    pub const fn edge(&self, e: usize) -> (VertexKey, VertexKey) {
        (self.vertices[next(e % 3)], self.vertices[prev(e % 3)])
    }

    /// Index of the edge running from `from` to `to` in this triangle's
    /// counter-clockwise order.
    #[must_use]
    pub fn edge_index(&self, from: VertexKey, to: VertexKey) -> Option<usize> {
        (0..3).find(|&e| self.edge(e) == (from, to))
    }

    /// Slot holding `neighbor`.
    #[must_use]
    pub fn neighbor_index(&self, neighbor: TriangleKey) -> Option<usize> {
        self.neighbors.iter().position(|&n| n == Some(neighbor))
    }

    /// Returns `true` if no slot is empty.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.neighbors.iter().all(Option::is_some)
    }

    /// Cached circumcircle; `None` inside means the triangle is degenerate.
    pub(crate) const fn circumcircle_cache(&self) -> &OnceLock<Option<Circumcircle>> {
        &self.circumcircle
    }

    pub(crate) fn set_vertex(&mut self, i: usize, vertex: VertexKey) {
        self.vertices[i % 3] = vertex;
        self.circumcircle = OnceLock::new();
    }

    pub(crate) const fn set_neighbor(&mut self, i: usize, neighbor: Option<TriangleKey>) {
        self.neighbors[i % 3] = neighbor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collections::StorageMap;

    fn keys() -> [VertexKey; 3] {
        let mut arena: StorageMap<VertexKey, ()> = StorageMap::with_key();
        [arena.insert(()), arena.insert(()), arena.insert(())]
    }

    #[test]
    fn index_helpers_wrap() {
        assert_eq!([next(0), next(1), next(2)], [1, 2, 0]);
        assert_eq!([prev(0), prev(1), prev(2)], [2, 0, 1]);
    }

    #[test]
    fn rejects_duplicate_corners() {
        let [a, b, _] = keys();
        let err = Triangle::new([a, b, a]).unwrap_err();
        assert_eq!(
            err,
            TriangleValidationError::DuplicateVertex {
                vertex: a,
                first: 0,
                second: 2,
            }
        );
    }

    #[test]
    fn edges_are_opposite_corners() {
        let [a, b, c] = keys();
        let t = Triangle::new([a, b, c]).unwrap();
        assert_eq!(t.edge(0), (b, c));
        assert_eq!(t.edge(1), (c, a));
        assert_eq!(t.edge(2), (a, b));
        assert_eq!(t.edge_index(c, a), Some(1));
        assert_eq!(t.edge_index(a, c), None);
        assert_eq!(t.vertex_index(c), Some(2));
        assert!(t.contains_vertex(b));
        assert_eq!(t.vertex(4), b);
    }

    #[test]
    fn neighbor_slots() {
        let [a, b, c] = keys();
        let mut arena: StorageMap<TriangleKey, ()> = StorageMap::with_key();
        let n = arena.insert(());

        let mut t = Triangle::new([a, b, c]).unwrap();
        assert!(!t.is_closed());
        t.set_neighbor(1, Some(n));
        assert_eq!(t.neighbor(1), Some(n));
        assert_eq!(t.neighbor_index(n), Some(1));
        assert_eq!(t.neighbors(), &[None, Some(n), None]);
    }

    #[test]
    fn set_vertex_resets_circumcircle_cache() {
        let [a, b, c] = keys();
        let mut t = Triangle::new([a, b, c]).unwrap();
        let _ = t.circumcircle_cache().set(None);
        assert!(t.circumcircle_cache().get().is_some());

        let cloned = t.clone();
        assert!(cloned.circumcircle_cache().get().is_some());

        t.set_vertex(2, c);
        assert!(t.circumcircle_cache().get().is_none());
    }
}
