//! Incremental point insertion.
//!
//! Inserting a point locates it by walking, splits the triangle (or the two
//! triangles sharing an edge) that contains it into a fan around the new
//! vertex, and legalizes the edges opposite the new vertex.
//!
//! Every split is described by the ring of existing vertices around the new
//! point, counter-clockwise, together with the outer neighbor across each
//! ring edge:
//!
//! | Location           | Removed | Ring           | Created |
//! |--------------------|---------|----------------|---------|
//! | inside `t`         | `t`     | closed, 3      | 3       |
//! | on edge `t`/`u`    | `t`,`u` | closed, 4      | 4       |
//! | on an outer edge   | `t`     | open, 3        | 2       |
//!
//! Duplicate points, invalid coordinates, points outside the triangulation
//! and degenerate fans are all detected before anything is mutated.

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::core::algorithms::flips::{FlipError, legalize};
use crate::core::algorithms::locate::{LocateError, LocateResult, locate};
use crate::core::collections::{NewTriangleBuffer, SmallBuffer, TriangleKey, VertexKey};
use crate::core::config::DuplicatePolicy;
use crate::core::operations::{InsertionOutcome, InsertionResult, InsertionStatistics, SplitKind};
use crate::core::triangle::{Triangle, next, prev};
use crate::core::triangulation::Triangulation;
use crate::core::vertex::{Vertex, VertexKind};
use crate::geometry::kernel::Kernel;
use crate::geometry::point::{CoordinateValidationError, Point};

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Degenerate geometry encountered during construction or insertion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DegeneracyError {
    /// The point coincides with an existing vertex.
    #[error("Point {point} coincides with existing vertex {existing:?}")]
    DuplicatePoint {
        /// The rejected point.
        point: Point,
        /// The vertex already at that position.
        existing: VertexKey,
    },

    /// A split would create a triangle with collinear corners.
    #[error("Split would create a zero-area triangle {a}, {b}, {c}")]
    ZeroAreaTriangle {
        /// First corner (the new point).
        a: Point,
        /// Second corner.
        b: Point,
        /// Third corner.
        c: Point,
    },

    /// Batch construction was given three or more points, all collinear.
    #[error("All {count} input points are collinear")]
    CollinearInput {
        /// Number of points supplied.
        count: usize,
    },
}

/// Errors that abort a single insertion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsertionError {
    /// Point location failed.
    #[error("Location error: {0}")]
    Location(#[from] LocateError),

    /// The point is a duplicate or the split would be degenerate.
    #[error("Degenerate geometry: {0}")]
    Degenerate(#[from] DegeneracyError),

    /// The point has a non-finite coordinate.
    #[error("Invalid point: {0}")]
    InvalidPoint(#[from] CoordinateValidationError),

    /// Legalization found corrupt adjacency.
    #[error("Flip error: {0}")]
    Flip(#[from] FlipError),

    /// The triangulation failed a consistency check.
    #[error("Triangulation inconsistent: {message}")]
    Inconsistent {
        /// Description of the failure.
        message: String,
    },
}

impl InsertionError {
    /// Returns `true` if the point lies outside the sentinel triangle.
    #[must_use]
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            Self::Location(LocateError::OutsideTriangulation { .. })
        )
    }

    /// Returns `true` if the walk detected a cycle.
    #[must_use]
    pub const fn is_cycle(&self) -> bool {
        matches!(self, Self::Location(LocateError::CycleDetected { .. }))
    }

    /// Returns `true` for degenerate-geometry failures, duplicates included.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate(_))
    }

    /// Returns `true` if the triangulation was left unchanged by the failed
    /// insertion.
    #[must_use]
    pub const fn leaves_unchanged(&self) -> bool {
        matches!(
            self,
            Self::InvalidPoint(_)
                | Self::Degenerate(_)
                | Self::Location(LocateError::OutsideTriangulation { .. })
        )
    }
}

// =============================================================================
// INSERTION
// =============================================================================

/// Vertices and outer neighbors around a new point.
struct Ring {
    vertices: SmallBuffer<VertexKey, 4>,
    outer: SmallBuffer<Option<TriangleKey>, 4>,
    closed: bool,
    removed: SmallBuffer<TriangleKey, 2>,
    kind: SplitKind,
}

impl Ring {
    /// Number of fan triangles.
    fn len(&self) -> usize {
        if self.closed {
            self.vertices.len()
        } else {
            self.vertices.len() - 1
        }
    }

    /// Ring edge `i`, counter-clockwise around the new point.
    fn edge(&self, i: usize) -> (VertexKey, VertexKey) {
        let n = self.vertices.len();
        (self.vertices[i], self.vertices[(i + 1) % n])
    }
}

/// Returns `true` if `(a, b, c)` is strictly counter-clockwise under
/// `kernel`.
#[must_use]
pub fn is_non_degenerate<K: Kernel>(kernel: &K, a: &Point, b: &Point, c: &Point) -> bool {
    kernel.orientation(a, b, c) > 0.0
}

/// Inserts `point` into `tri`.
///
/// # Errors
///
/// See [`InsertionError`]. Duplicate, invalid and out-of-bounds points leave
/// the triangulation unchanged; other failures leave it in an undefined
/// state.
pub fn insert<K: Kernel>(
    tri: &mut Triangulation<K>,
    point: Point,
) -> Result<(InsertionOutcome, InsertionStatistics), InsertionError> {
    point.validate()?;

    let walk = locate(tri, &point, None)?;
    let mut stats = InsertionStatistics {
        walk_steps: walk.steps,
        orientation_tests: walk.orientation_tests,
        ..InsertionStatistics::default()
    };

    let ring = match walk.result {
        LocateResult::OnVertex(t, corner) => {
            let existing = corner_of(tri, t, usize::from(corner))?;
            return handle_duplicate(tri, point, existing, stats);
        }
        LocateResult::Inside(t) => interior_ring(tri, t)?,
        LocateResult::OnEdge(t, e) => edge_ring(tri, t, usize::from(e))?,
    };

    check_fan(tri, &point, &ring)?;

    let id = tri.vertices.len();
    let vertex_key = tri
        .vertices
        .insert(Vertex::new(point, id, VertexKind::Input));

    let fan = build_fan(tri, vertex_key, &ring)?;
    let seeds: SmallBuffer<(TriangleKey, usize), 4> = fan.iter().map(|&t| (t, 0)).collect();
    let legalized = legalize(tri, &seeds)?;

    stats.in_circle_tests = legalized.in_circle_tests;
    stats.flips = legalized.flips;
    stats.split = Some(ring.kind);
    stats.result = InsertionResult::Inserted;

    let hint = fan.last().copied();
    if let Some(last) = hint {
        tri.last_triangle = last;
    }
    tri.insertion_order.push(vertex_key);
    tri.stats.record(&stats);

    trace!(
        %point,
        id,
        split = ?ring.kind,
        walk_steps = stats.walk_steps,
        flips = stats.flips,
        "inserted vertex"
    );

    if tri.config.validate_after_insert {
        tri.validate_structure().map_err(|err| {
            debug!(%err, "validation failed after insertion");
            InsertionError::Inconsistent {
                message: err.to_string(),
            }
        })?;
    }

    Ok((InsertionOutcome::Inserted { vertex_key, hint }, stats))
}

fn handle_duplicate<K: Kernel>(
    tri: &mut Triangulation<K>,
    point: Point,
    existing: VertexKey,
    mut stats: InsertionStatistics,
) -> Result<(InsertionOutcome, InsertionStatistics), InsertionError> {
    match tri.config.duplicate_policy {
        DuplicatePolicy::Reject => {
            warn!(%point, ?existing, "rejecting duplicate point");
            Err(DegeneracyError::DuplicatePoint { point, existing }.into())
        }
        DuplicatePolicy::Skip => {
            debug!(%point, ?existing, "skipping duplicate point");
            stats.result = InsertionResult::SkippedDuplicate;
            tri.stats.record(&stats);
            Ok((InsertionOutcome::Skipped { existing }, stats))
        }
    }
}

fn corner_of<K: Kernel>(
    tri: &Triangulation<K>,
    t: TriangleKey,
    corner: usize,
) -> Result<VertexKey, InsertionError> {
    tri.triangles
        .get(t)
        .map(|triangle| triangle.vertex(corner))
        .ok_or_else(|| LocateError::InvalidTriangle { triangle: t }.into())
}

fn interior_ring<K: Kernel>(tri: &Triangulation<K>, t: TriangleKey) -> Result<Ring, InsertionError> {
    let triangle = tri
        .triangles
        .get(t)
        .ok_or(LocateError::InvalidTriangle { triangle: t })?;
    let [v0, v1, v2] = *triangle.vertices();
    let [n0, n1, n2] = *triangle.neighbors();
    Ok(Ring {
        vertices: SmallBuffer::from_slice(&[v1, v2, v0]),
        outer: SmallBuffer::from_slice(&[n0, n1, n2]),
        closed: true,
        removed: SmallBuffer::from_slice(&[t]),
        kind: SplitKind::Interior,
    })
}

fn edge_ring<K: Kernel>(
    tri: &Triangulation<K>,
    t: TriangleKey,
    e: usize,
) -> Result<Ring, InsertionError> {
    let triangle = tri
        .triangles
        .get(t)
        .ok_or(LocateError::InvalidTriangle { triangle: t })?;
    let a = triangle.vertex(e);
    let b = triangle.vertex(next(e));
    let c = triangle.vertex(prev(e));
    let t_next = triangle.neighbor(next(e));
    let t_prev = triangle.neighbor(prev(e));

    let Some(u) = triangle.neighbor(e) else {
        return Ok(Ring {
            vertices: SmallBuffer::from_slice(&[c, a, b]),
            outer: SmallBuffer::from_slice(&[t_next, t_prev]),
            closed: false,
            removed: SmallBuffer::from_slice(&[t]),
            kind: SplitKind::HullEdge,
        });
    };

    let neighbor = tri
        .triangles
        .get(u)
        .ok_or(LocateError::InvalidTriangle { triangle: u })?;
    let f = neighbor
        .edge_index(c, b)
        .ok_or_else(|| InsertionError::Inconsistent {
            message: format!("neighbor {u:?} of {t:?} does not share edge {e}"),
        })?;
    let d = neighbor.vertex(f);

    Ok(Ring {
        vertices: SmallBuffer::from_slice(&[a, b, d, c]),
        outer: SmallBuffer::from_slice(&[
            t_prev,
            neighbor.neighbor(next(f)),
            neighbor.neighbor(prev(f)),
            t_next,
        ]),
        closed: true,
        removed: SmallBuffer::from_slice(&[t, u]),
        kind: SplitKind::Edge,
    })
}

/// Checks that every fan triangle would be strictly counter-clockwise.
fn check_fan<K: Kernel>(
    tri: &Triangulation<K>,
    point: &Point,
    ring: &Ring,
) -> Result<(), InsertionError> {
    for i in 0..ring.len() {
        let (from, to) = ring.edge(i);
        let b = point_of(tri, from)?;
        let c = point_of(tri, to)?;
        if !is_non_degenerate(&tri.kernel, point, &b, &c) {
            return Err(DegeneracyError::ZeroAreaTriangle { a: *point, b, c }.into());
        }
    }
    Ok(())
}

fn point_of<K: Kernel>(tri: &Triangulation<K>, v: VertexKey) -> Result<Point, InsertionError> {
    tri.vertices
        .get(v)
        .map(|vertex| *vertex.point())
        .ok_or_else(|| InsertionError::Inconsistent {
            message: format!("vertex {v:?} not found"),
        })
}

/// Replaces the ring's removed triangles by a fan around `p`.
///
/// Fan triangle `i` is `[p, ring[i], ring[i + 1]]`; its slot 0 faces the
/// outer neighbor, slot 1 the next fan triangle and slot 2 the previous one.
fn build_fan<K: Kernel>(
    tri: &mut Triangulation<K>,
    p: VertexKey,
    ring: &Ring,
) -> Result<NewTriangleBuffer, InsertionError> {
    for &t in &ring.removed {
        tri.triangles.remove(t);
    }

    let m = ring.len();
    let mut fan = NewTriangleBuffer::new();
    for i in 0..m {
        let (from, to) = ring.edge(i);
        let triangle = Triangle::new([p, from, to]).map_err(|err| InsertionError::Inconsistent {
            message: err.to_string(),
        })?;
        fan.push(tri.triangles.insert(triangle));
    }

    for (i, &x) in fan.iter().enumerate() {
        let (next_slot, prev_slot) = if ring.closed {
            (Some(fan[(i + 1) % m]), Some(fan[(i + m - 1) % m]))
        } else {
            (fan.get(i + 1).copied(), i.checked_sub(1).map(|j| fan[j]))
        };
        let triangle = &mut tri.triangles[x];
        triangle.set_neighbor(0, ring.outer[i]);
        triangle.set_neighbor(1, next_slot);
        triangle.set_neighbor(2, prev_slot);
    }

    for (i, &x) in fan.iter().enumerate() {
        let Some(outer) = ring.outer[i] else {
            continue;
        };
        let (from, to) = ring.edge(i);
        let neighbor =
            tri.triangles
                .get_mut(outer)
                .ok_or_else(|| InsertionError::Inconsistent {
                    message: format!("outer neighbor {outer:?} not found"),
                })?;
        let slot = neighbor
            .edge_index(to, from)
            .ok_or_else(|| InsertionError::Inconsistent {
                message: format!("outer neighbor {outer:?} does not hold edge {i} of the ring"),
            })?;
        neighbor.set_neighbor(slot, Some(x));
    }

    for (i, &x) in fan.iter().enumerate() {
        let (from, to) = ring.edge(i);
        for v in [from, to] {
            let Some(vertex) = tri.vertices.get_mut(v) else {
                continue;
            };
            if vertex
                .first_triangle()
                .is_none_or(|first| ring.removed.contains(&first))
            {
                vertex.set_first(x);
            }
        }
    }
    if let (Some(vertex), Some(&first)) = (tri.vertices.get_mut(p), fan.first()) {
        vertex.set_first(first);
    }

    Ok(fan)
}
