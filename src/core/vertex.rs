//! Vertices of a planar triangulation.
//!
//! A [`Vertex`] is a [`Point`] that has been admitted into a triangulation. It
//! carries a monotonically increasing identifier, its [`VertexKind`], and a
//! reference to one incident triangle that serves as a re-entry point for
//! neighborhood queries.
//!
//! Vertices are created only by the owning
//! [`Triangulation`](crate::core::triangulation::Triangulation) and are never
//! removed.

#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::collections::TriangleKey;
use crate::geometry::point::Point;

/// Number of sentinel vertices in every triangulation.
pub const SENTINEL_COUNT: usize = 3;

/// Whether a vertex is one of the synthetic sentinel corners or a real input
/// point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    /// One of the three corners of the enclosing super-triangle.
    Sentinel,
    /// A point supplied by the caller.
    Input,
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sentinel => write!(f, "sentinel"),
            Self::Input => write!(f, "input"),
        }
    }
}

// =============================================================================
// VERTEX STRUCT DEFINITION
// =============================================================================

/// A point owned by a triangulation.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::prelude::*;
///
/// let mut tri = Triangulation::new(BoundingBox::unit()).unwrap();
/// let InsertionOutcome::Inserted { vertex_key, .. } = tri.insert(Point::new(0.5, 0.5)).unwrap()
/// else {
///     unreachable!()
/// };
///
/// let vertex = tri.vertex(vertex_key).unwrap();
/// assert_eq!(vertex.id(), 3);
/// assert_eq!(vertex.point_index(), Some(0));
/// assert!(!vertex.is_sentinel());
/// assert!(vertex.first_triangle().is_some());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    point: Point,
    id: usize,
    kind: VertexKind,
    /// One triangle having this vertex as a corner.
    first: Option<TriangleKey>,
}

impl Vertex {
    pub(crate) const fn new(point: Point, id: usize, kind: VertexKind) -> Self {
        Self {
            point,
            id,
            kind,
            first: None,
        }
    }

    /// The vertex position.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> &Point {
        &self.point
    }

    /// Unique identifier, assigned in creation order. Sentinels are `0..3`.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Sentinel or input.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> VertexKind {
        self.kind
    }

    /// Returns `true` for the three super-triangle corners.
    #[inline]
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        matches!(self.kind, VertexKind::Sentinel)
    }

    /// Index of this vertex among the real input points (first real point is
    /// `0`), or `None` for a sentinel.
    #[must_use]
    pub const fn point_index(&self) -> Option<usize> {
        match self.kind {
            VertexKind::Sentinel => None,
            VertexKind::Input => self.id.checked_sub(SENTINEL_COUNT),
        }
    }

    /// One triangle incident to this vertex.
    #[inline]
    #[must_use]
    pub const fn first_triangle(&self) -> Option<TriangleKey> {
        self.first
    }

    #[inline]
    pub(crate) const fn set_first(&mut self, triangle: TriangleKey) {
        self.first = Some(triangle);
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{} {}", self.kind, self.id, self.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_index_skips_sentinels() {
        let sentinel = Vertex::new(Point::new(0.0, 0.0), 2, VertexKind::Sentinel);
        assert!(sentinel.is_sentinel());
        assert_eq!(sentinel.point_index(), None);

        let first_real = Vertex::new(Point::new(1.0, 1.0), 3, VertexKind::Input);
        assert_eq!(first_real.point_index(), Some(0));
        let tenth = Vertex::new(Point::new(1.0, 1.0), 12, VertexKind::Input);
        assert_eq!(tenth.point_index(), Some(9));
    }

    #[test]
    fn first_triangle_is_set_once_assigned() {
        let mut v = Vertex::new(Point::new(0.0, 0.0), 3, VertexKind::Input);
        assert!(v.first_triangle().is_none());
        let key = TriangleKey::default();
        v.set_first(key);
        assert_eq!(v.first_triangle(), Some(key));
    }

    #[test]
    fn vertex_display() {
        let v = Vertex::new(Point::new(1.0, 2.0), 4, VertexKind::Input);
        assert_eq!(v.to_string(), "input #4 (1, 2)");
    }
}
