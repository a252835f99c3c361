//! Edge legalization by Lawson flips.
//!
//! After a split, the edges opposite the new vertex may violate the
//! empty-circumcircle property. [`legalize`] checks each such edge and flips
//! the illegal ones, which exposes two further edges to check. Work is kept on
//! an explicit LIFO stack, so the order of flips matches the usual recursive
//! formulation without growing the call stack.
//!
//! A flip replaces the diagonal of the convex quadrilateral formed by two
//! adjacent triangles:
//!
//! ```text
//!        c                    c
//!       /|\                  / \
//!      / | \      flip      / u \
//!     a  |  d    ------>   a-----d
//!      \ | /                \ t /
//!       \|/                  \ /
//!        b                    b
//! ```
//!
//! Both triangles keep their keys.

use tracing::trace;

use crate::core::collections::{LegalizeStack, TriangleKey, VertexKey};
use crate::core::triangle::{next, prev};
use crate::core::triangulation::Triangulation;
use crate::geometry::kernel::Kernel;

/// Errors raised while flipping edges.
///
/// Any of these means the adjacency structure is corrupt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlipError {
    /// The referenced triangle was not found.
    #[error("Triangle not found: {triangle:?}")]
    MissingTriangle {
        /// Missing triangle key.
        triangle: TriangleKey,
    },
    /// The referenced vertex was not found.
    #[error("Vertex not found: {vertex:?}")]
    MissingVertex {
        /// Missing vertex key.
        vertex: VertexKey,
    },
    /// The neighbor does not contain the shared edge in reverse order.
    #[error("Edge adjacency mismatch between triangle {triangle:?} and neighbor {neighbor:?}")]
    InvalidEdgeAdjacency {
        /// Triangle holding the edge.
        triangle: TriangleKey,
        /// Neighbor expected to share it.
        neighbor: TriangleKey,
    },
}

/// Counters from one legalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegalizeStatistics {
    /// In-circle predicates evaluated.
    pub in_circle_tests: usize,
    /// Flips performed.
    pub flips: usize,
}

/// Legalizes the given `(triangle, edge)` pairs and every edge exposed by the
/// resulting flips.
///
/// Seeds are processed in the given order. An edge is illegal when the
/// opposite corner of the neighbor lies strictly inside the triangle's
/// circumcircle; co-circular configurations are left alone. Edges without a
/// neighbor are always legal.
///
/// # Errors
///
/// Returns [`FlipError`] if a referenced triangle or vertex is missing or two
/// neighbors do not share an edge.
pub(crate) fn legalize<K: Kernel>(
    tri: &mut Triangulation<K>,
    seeds: &[(TriangleKey, usize)],
) -> Result<LegalizeStatistics, FlipError> {
    let mut stats = LegalizeStatistics::default();
    let mut stack: LegalizeStack = seeds
        .iter()
        .rev()
        .map(|&(t, e)| (t, edge_u8(e)))
        .collect();

    while let Some((t, e)) = stack.pop() {
        let e = usize::from(e);
        let triangle = tri
            .triangles
            .get(t)
            .ok_or(FlipError::MissingTriangle { triangle: t })?;
        let Some(u) = triangle.neighbor(e) else {
            continue;
        };
        let (from, to) = triangle.edge(e);
        let f = tri
            .triangles
            .get(u)
            .ok_or(FlipError::MissingTriangle { triangle: u })?
            .edge_index(to, from)
            .ok_or(FlipError::InvalidEdgeAdjacency {
                triangle: t,
                neighbor: u,
            })?;

        let [a, b, c] = tri
            .triangle_points(t)
            .ok_or(FlipError::MissingTriangle { triangle: t })?;
        let d_key = tri.triangles[u].vertex(f);
        let d = *tri
            .vertices
            .get(d_key)
            .ok_or(FlipError::MissingVertex { vertex: d_key })?
            .point();

        stats.in_circle_tests += 1;
        if tri.kernel.in_circle(&a, &b, &c, &d) > 0.0 {
            flip(tri, t, e, u, f)?;
            stats.flips += 1;
            stack.push((u, edge_u8(prev(f))));
            stack.push((t, edge_u8(e)));
        }
    }

    Ok(stats)
}

/// Flips the edge shared by `t` (opposite corner `e`) and `u` (opposite
/// corner `f`).
///
/// With `t = [a, b, c]` rotated so that `a` is at `e`, and `u = [d, c, b]`
/// rotated so that `d` is at `f`, the result is `t = [a, b, d]` and
/// `u = [d, c, a]`, in the same slots. The caller guarantees that the
/// quadrilateral `a, b, d, c` is strictly convex.
///
/// # Errors
///
/// Returns [`FlipError`] if a triangle is missing or an outer neighbor does
/// not hold the expected edge.
pub(crate) fn flip<K: Kernel>(
    tri: &mut Triangulation<K>,
    t: TriangleKey,
    e: usize,
    u: TriangleKey,
    f: usize,
) -> Result<(), FlipError> {
    let t_old = tri
        .triangles
        .get(t)
        .ok_or(FlipError::MissingTriangle { triangle: t })?;
    let u_old = tri
        .triangles
        .get(u)
        .ok_or(FlipError::MissingTriangle { triangle: u })?;

    let a = t_old.vertex(e);
    let b = t_old.vertex(next(e));
    let c = t_old.vertex(prev(e));
    let d = u_old.vertex(f);
    // Outer neighbors that change owner.
    let n_tb = t_old.neighbor(next(e));
    let n_uc = u_old.neighbor(next(f));

    trace!(?t, ?u, "flipping edge");

    {
        let t_new = &mut tri.triangles[t];
        t_new.set_vertex(prev(e), d);
        t_new.set_neighbor(e, n_uc);
        t_new.set_neighbor(next(e), Some(u));
    }
    {
        let u_new = &mut tri.triangles[u];
        u_new.set_vertex(prev(f), a);
        u_new.set_neighbor(f, n_tb);
        u_new.set_neighbor(next(f), Some(t));
    }

    if let Some(n) = n_uc {
        relink(tri, n, (d, b), u, t)?;
    }
    if let Some(n) = n_tb {
        relink(tri, n, (a, c), t, u)?;
    }

    if tri.vertices.get(b).and_then(|v| v.first_triangle()) == Some(u) {
        tri.vertices[b].set_first(t);
    }
    if tri.vertices.get(c).and_then(|v| v.first_triangle()) == Some(t) {
        tri.vertices[c].set_first(u);
    }

    Ok(())
}

/// Points the slot of `neighbor` holding the directed edge `edge` at `to`.
fn relink<K: Kernel>(
    tri: &mut Triangulation<K>,
    neighbor: TriangleKey,
    (from_v, to_v): (VertexKey, VertexKey),
    from: TriangleKey,
    to: TriangleKey,
) -> Result<(), FlipError> {
    let triangle = tri
        .triangles
        .get_mut(neighbor)
        .ok_or(FlipError::MissingTriangle {
            triangle: neighbor,
        })?;
    let slot = triangle
        .edge_index(from_v, to_v)
        .ok_or(FlipError::InvalidEdgeAdjacency {
            triangle: from,
            neighbor,
        })?;
    triangle.set_neighbor(slot, Some(to));
    Ok(())
}

#[expect(clippy::cast_possible_truncation, reason = "triangle indices are 0..3")]
const fn edge_u8(e: usize) -> u8 {
    e as u8
}
