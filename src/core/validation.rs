//! Structural and geometric validation of a triangulation.
//!
//! The checks, from cheapest to most expensive:
//!
//! 1. [`validate_neighbors`]: every adjacency is mutual and the shared edge
//!    is traversed in opposite directions;
//! 2. [`validate_vertex_incidence`]: every vertex references a live triangle
//!    that has it as a corner;
//! 3. [`validate_orientation`]: every triangle is strictly counter-clockwise;
//! 4. [`validate_delaunay`]: no vertex lies strictly inside any triangle's
//!    circumcircle. This is a global check, quadratic in the input size.

use thiserror::Error;
use tracing::debug;

use crate::core::collections::{TriangleKey, VertexKey};
use crate::core::triangulation::Triangulation;
use crate::geometry::kernel::Kernel;

/// Errors reported by validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TriangulationValidationError {
    /// A triangle references a missing triangle or vertex.
    #[error("Dangling reference: {message}")]
    DanglingReference {
        /// Description of the reference.
        message: String,
    },
    /// Neighbor relationships are not mutual.
    #[error("Invalid neighbor relationships: {message}")]
    InvalidNeighbors {
        /// Description of the failure.
        message: String,
    },
    /// A vertex's incident-triangle reference is missing or wrong.
    #[error("Invalid vertex incidence for {vertex:?}: {message}")]
    InvalidVertexIncidence {
        /// The vertex.
        vertex: VertexKey,
        /// Description of the failure.
        message: String,
    },
    /// A triangle is not strictly counter-clockwise.
    #[error("Triangle {triangle:?} is not counter-clockwise")]
    InvalidOrientation {
        /// The triangle.
        triangle: TriangleKey,
    },
    /// A vertex lies strictly inside a triangle's circumcircle.
    #[error("Vertex {vertex:?} lies inside the circumcircle of triangle {triangle:?}")]
    DelaunayViolation {
        /// The triangle.
        triangle: TriangleKey,
        /// The offending vertex.
        vertex: VertexKey,
    },
}

/// The invariant a violation belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// Mutual adjacency.
    NeighborConsistency,
    /// Vertex `first` references.
    VertexIncidence,
    /// Counter-clockwise triangles.
    Orientation,
    /// Empty circumcircles.
    Delaunay,
}

/// A single invariant violation recorded by [`validation_report`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvariantViolation {
    /// The kind of invariant that failed.
    pub kind: InvariantKind,
    /// The first failure found for it.
    pub error: TriangulationValidationError,
}

/// All failed invariants at once, for debugging and test diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriangulationValidationReport {
    /// Violations, in check order.
    pub violations: Vec<InvariantViolation>,
}

impl TriangulationValidationReport {
    /// Returns `true` if no violations were recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Options for [`validation_report`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Whether to run the global Delaunay check.
    pub check_delaunay: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_delaunay: true,
        }
    }
}

// =============================================================================
// CHECKS
// =============================================================================

/// Checks that adjacency is mutual and consistent with the corners.
///
/// # Errors
///
/// Returns the first inconsistency found.
pub fn validate_neighbors<K: Kernel>(
    tri: &Triangulation<K>,
) -> Result<(), TriangulationValidationError> {
    for (t, triangle) in &tri.triangles {
        for &v in triangle.vertices() {
            if !tri.vertices.contains_key(v) {
                return Err(TriangulationValidationError::DanglingReference {
                    message: format!("triangle {t:?} has missing corner {v:?}"),
                });
            }
        }

        for e in 0..3 {
            let Some(u) = triangle.neighbor(e) else {
                continue;
            };
            let neighbor =
                tri.triangles
                    .get(u)
                    .ok_or_else(|| TriangulationValidationError::DanglingReference {
                        message: format!("triangle {t:?} slot {e} points at missing {u:?}"),
                    })?;

            let back: Vec<usize> = (0..3).filter(|&f| neighbor.neighbor(f) == Some(t)).collect();
            let [f] = back[..] else {
                return Err(TriangulationValidationError::InvalidNeighbors {
                    message: format!(
                        "{u:?} refers back to {t:?} {} times, expected once",
                        back.len()
                    ),
                });
            };

            let (from, to) = triangle.edge(e);
            if neighbor.edge(f) != (to, from) {
                return Err(TriangulationValidationError::InvalidNeighbors {
                    message: format!("{t:?} slot {e} and {u:?} slot {f} do not share an edge"),
                });
            }
        }
    }
    Ok(())
}

/// Checks that every vertex references a live incident triangle.
///
/// # Errors
///
/// Returns the first vertex whose reference is missing or wrong.
pub fn validate_vertex_incidence<K: Kernel>(
    tri: &Triangulation<K>,
) -> Result<(), TriangulationValidationError> {
    for (v, vertex) in &tri.vertices {
        let Some(t) = vertex.first_triangle() else {
            return Err(TriangulationValidationError::InvalidVertexIncidence {
                vertex: v,
                message: "no incident triangle".to_string(),
            });
        };
        match tri.triangles.get(t) {
            None => {
                return Err(TriangulationValidationError::InvalidVertexIncidence {
                    vertex: v,
                    message: format!("incident triangle {t:?} is not live"),
                });
            }
            Some(triangle) if !triangle.contains_vertex(v) => {
                return Err(TriangulationValidationError::InvalidVertexIncidence {
                    vertex: v,
                    message: format!("incident triangle {t:?} does not contain it"),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Checks that every triangle is strictly counter-clockwise.
///
/// # Errors
///
/// Returns the first collinear or clockwise triangle.
pub fn validate_orientation<K: Kernel>(
    tri: &Triangulation<K>,
) -> Result<(), TriangulationValidationError> {
    for t in tri.triangles.keys() {
        let [a, b, c] = tri
            .triangle_points(t)
            .ok_or_else(|| TriangulationValidationError::DanglingReference {
                message: format!("triangle {t:?} has a missing corner"),
            })?;
        if tri.kernel.orientation(&a, &b, &c) <= 0.0 {
            return Err(TriangulationValidationError::InvalidOrientation { triangle: t });
        }
    }
    Ok(())
}

/// Finds every `(triangle, vertex)` pair where the vertex lies strictly inside
/// the triangle's circumcircle.
///
/// Co-circular vertices are not violations.
#[must_use]
pub fn find_delaunay_violations<K: Kernel>(tri: &Triangulation<K>) -> Vec<(TriangleKey, VertexKey)> {
    let mut violations = Vec::new();
    for (t, triangle) in &tri.triangles {
        let Some([a, b, c]) = tri.triangle_points(t) else {
            continue;
        };
        for (v, vertex) in &tri.vertices {
            if triangle.contains_vertex(v) {
                continue;
            }
            if tri.kernel.in_circle(&a, &b, &c, vertex.point()) > 0.0 {
                violations.push((t, v));
            }
        }
    }
    violations
}

/// Checks the empty-circumcircle property over every triangle and vertex.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_delaunay<K: Kernel>(
    tri: &Triangulation<K>,
) -> Result<(), TriangulationValidationError> {
    match find_delaunay_violations(tri).first() {
        Some(&(triangle, vertex)) => {
            Err(TriangulationValidationError::DelaunayViolation { triangle, vertex })
        }
        None => Ok(()),
    }
}

/// Runs the structural checks (adjacency, incidence, orientation).
///
/// # Errors
///
/// Returns the first failure.
pub fn validate_structure<K: Kernel>(
    tri: &Triangulation<K>,
) -> Result<(), TriangulationValidationError> {
    validate_neighbors(tri)?;
    validate_vertex_incidence(tri)?;
    validate_orientation(tri)
}

/// Runs every check and reports each failed invariant.
#[must_use]
pub fn validation_report<K: Kernel>(
    tri: &Triangulation<K>,
    options: ValidationOptions,
) -> TriangulationValidationReport {
    type Check<K> = fn(&Triangulation<K>) -> Result<(), TriangulationValidationError>;

    let mut checks: Vec<(InvariantKind, Check<K>)> = vec![
        (InvariantKind::NeighborConsistency, validate_neighbors),
        (InvariantKind::VertexIncidence, validate_vertex_incidence),
        (InvariantKind::Orientation, validate_orientation),
    ];
    if options.check_delaunay {
        checks.push((InvariantKind::Delaunay, validate_delaunay));
    }

    let violations: Vec<InvariantViolation> = checks
        .into_iter()
        .filter_map(|(kind, check)| check(tri).err().map(|error| InvariantViolation { kind, error }))
        .collect();

    for violation in &violations {
        debug!(kind = ?violation.kind, error = %violation.error, "validation failure");
    }

    TriangulationValidationReport { violations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bounds::BoundingBox;
    use crate::geometry::point::Point;

    fn sample() -> Triangulation {
        Triangulation::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.5),
            Point::new(1.0, 2.0),
            Point::new(2.5, 3.0),
            Point::new(-1.0, 1.5),
        ])
        .unwrap()
    }

    #[test]
    fn fresh_and_built_triangulations_are_valid() {
        let tri = Triangulation::new(BoundingBox::unit()).unwrap();
        assert!(validate_structure(&tri).is_ok());
        assert!(validate_delaunay(&tri).is_ok());

        let tri = sample();
        assert!(validate_structure(&tri).is_ok());
        assert!(find_delaunay_violations(&tri).is_empty());
        assert!(validation_report(&tri, ValidationOptions::default()).is_empty());
    }

    #[test]
    fn broken_back_reference_is_reported() {
        let mut tri = sample();
        let (t, e) = tri
            .triangles
            .iter()
            .find_map(|(key, triangle)| triangle.neighbor(0).map(|_| (key, 0)))
            .unwrap();
        tri.triangles[t].set_neighbor(e, None);

        assert!(matches!(
            validate_neighbors(&tri),
            Err(TriangulationValidationError::InvalidNeighbors { .. })
        ));
        let report = validation_report(&tri, ValidationOptions::default());
        assert_eq!(report.violations[0].kind, InvariantKind::NeighborConsistency);
    }

    #[test]
    fn wrong_first_triangle_is_reported() {
        let mut tri = sample();
        let v = tri.insertion_order[0];
        let foreign = tri
            .triangles
            .iter()
            .find(|(_, triangle)| !triangle.contains_vertex(v))
            .map(|(key, _)| key)
            .unwrap();
        tri.vertices[v].set_first(foreign);

        assert!(matches!(
            validate_vertex_incidence(&tri),
            Err(TriangulationValidationError::InvalidVertexIncidence { vertex, .. }) if vertex == v
        ));
    }

    #[test]
    fn report_can_skip_delaunay() {
        let tri = sample();
        let report = validation_report(
            &tri,
            ValidationOptions {
                check_delaunay: false,
            },
        );
        assert!(report.is_empty());
    }
}
