//! The triangulation: owner of the vertex and triangle arenas.
//!
//! A [`Triangulation`] starts as a single sentinel super-triangle sized from
//! a bounding box, and grows by inserting points one at a time. It combines
//! a geometric [`Kernel`] for predicates with purely combinatorial storage:
//! all cross references are arena keys.
//!
//! # Examples
//!
//! ```rust
//! use planar_delaunay::prelude::*;
//!
//! let points = [
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(10.0, 10.0),
//!     Point::new(0.0, 10.0),
//! ];
//! let tri = Triangulation::from_points(&points).unwrap();
//!
//! assert_eq!(tri.number_of_vertices(), 4);
//! assert_eq!(tri.number_of_triangles(), 2 * 4 + 1);
//! assert_eq!(tri.edges().len(), 5);
//! assert!(tri.is_valid());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::algorithms::insertion::{self, DegeneracyError, InsertionError};
use crate::core::algorithms::locate::{self, LocateError, LocateResult, Walk, WalkTrace};
use crate::core::boundary::BoundaryAnalysis;
use crate::core::collections::{StorageMap, TriangleKey, VertexKey};
use crate::core::config::{ConfigValidationError, TriangulationConfig};
use crate::core::edge::{self, Edge, EdgeKey};
use crate::core::operations::{InsertionOutcome, InsertionStatistics, TriangulationStatistics};
use crate::core::triangle::{Triangle, TriangleValidationError};
use crate::core::validation::{
    self, TriangulationValidationError, TriangulationValidationReport, ValidationOptions,
};
use crate::core::vertex::{Vertex, VertexKind};
use crate::geometry::bounds::{BoundingBox, sentinel_triangle};
use crate::geometry::kernel::{Kernel, RobustKernel};
use crate::geometry::point::Point;
use crate::geometry::predicates::{Circumcircle, circumcircle, triangle_area};

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors from building a triangulation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TriangulationConstructionError {
    /// The bounding box is not finite and ordered, or its sentinel triangle
    /// is not representable.
    #[error("Invalid bounds {bounds:?}")]
    InvalidBounds {
        /// The rejected bounds.
        bounds: BoundingBox,
    },

    /// The input point set is degenerate.
    #[error("Degenerate input: {0}")]
    Degenerate(#[from] DegeneracyError),

    /// Inserting one of the input points failed.
    #[error("Failed to add vertex {index}: {source}")]
    FailedToAddVertex {
        /// Position of the point in the input.
        index: usize,
        /// The insertion failure.
        source: InsertionError,
    },

    /// The configuration violates a field constraint.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// The sentinel triangle could not be created.
    #[error("Invalid sentinel triangle: {0}")]
    InvalidTriangle(#[from] TriangleValidationError),
}

/// A triangle exported for consumers of the triangulation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriangleRecord {
    /// Vertex identifiers of the corners, counter-clockwise. Sentinels are
    /// `0..3`; real points start at `3`.
    pub vertex_ids: [usize; 3],
    /// Corner coordinates, in the same order.
    pub corners: [Point; 3],
    /// `true` if no corner is a sentinel.
    pub interior: bool,
}

// =============================================================================
// TRIANGULATION
// =============================================================================

/// An incremental Delaunay triangulation in the plane.
///
/// # Type Parameters
/// - `K`: geometric kernel evaluating the predicates, [`RobustKernel`] by
///   default.
#[derive(Clone, Debug)]
pub struct Triangulation<K: Kernel = RobustKernel> {
    pub(crate) kernel: K,
    pub(crate) config: TriangulationConfig,
    pub(crate) vertices: StorageMap<VertexKey, Vertex>,
    /// Real vertices in insertion order.
    pub(crate) insertion_order: Vec<VertexKey>,
    pub(crate) sentinels: [VertexKey; 3],
    pub(crate) triangles: StorageMap<TriangleKey, Triangle>,
    /// Most recently created triangle; default start for walks.
    pub(crate) last_triangle: TriangleKey,
    pub(crate) bounds: BoundingBox,
    pub(crate) stats: TriangulationStatistics,
}

impl Triangulation {
    /// Creates an empty triangulation whose sentinel triangle encloses
    /// `bounds`, with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationConstructionError::InvalidBounds`] for
    /// non-finite or inverted bounds.
    pub fn new(bounds: BoundingBox) -> Result<Self, TriangulationConstructionError> {
        Self::with_config(bounds, TriangulationConfig::default())
    }

    /// Creates an empty triangulation with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationConstructionError`] for invalid bounds or
    /// configuration.
    pub fn with_config(
        bounds: BoundingBox,
        config: TriangulationConfig,
    ) -> Result<Self, TriangulationConstructionError> {
        Self::with_kernel(RobustKernel, bounds, config)
    }

    /// Triangulates `points`, inserting them in order.
    ///
    /// The sentinel triangle is sized from the bounding box of the points
    /// (the unit square if there are none).
    ///
    /// # Errors
    ///
    /// - [`TriangulationConstructionError::FailedToAddVertex`] if a point is
    ///   invalid or its insertion fails (a duplicate, under the default
    ///   policy);
    /// - [`TriangulationConstructionError::Degenerate`] with
    ///   [`DegeneracyError::CollinearInput`] if three or more points are
    ///   given and all are collinear.
    pub fn from_points(points: &[Point]) -> Result<Self, TriangulationConstructionError> {
        Self::from_points_with_config(points, TriangulationConfig::default())
    }

    /// Like [`from_points`](Self::from_points), with an explicit configuration.
    ///
    /// # Errors
    ///
    /// See [`from_points`](Self::from_points).
    pub fn from_points_with_config(
        points: &[Point],
        config: TriangulationConfig,
    ) -> Result<Self, TriangulationConstructionError> {
        Self::from_points_with_kernel(RobustKernel, points, config)
    }
}

impl<K: Kernel> Triangulation<K> {
    /// Creates an empty triangulation with the given kernel.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationConstructionError`] for invalid bounds or
    /// configuration.
    pub fn with_kernel(
        kernel: K,
        bounds: BoundingBox,
        config: TriangulationConfig,
    ) -> Result<Self, TriangulationConstructionError> {
        config.validate()?;
        if !bounds.is_valid() {
            return Err(TriangulationConstructionError::InvalidBounds { bounds });
        }

        let corners = sentinel_triangle(&bounds, config.sentinel_scale);
        if !corners.iter().all(Point::is_finite)
            || !kernel.is_counter_clockwise(&corners[0], &corners[1], &corners[2])
        {
            return Err(TriangulationConstructionError::InvalidBounds { bounds });
        }

        let mut vertices = StorageMap::with_key();
        let mut id = 0;
        let sentinels = corners.map(|corner| {
            let key = vertices.insert(Vertex::new(corner, id, VertexKind::Sentinel));
            id += 1;
            key
        });

        let mut triangles = StorageMap::with_key();
        let seed = triangles.insert(Triangle::new(sentinels)?);
        for &s in &sentinels {
            vertices[s].set_first(seed);
        }

        debug!(
            a = %corners[0],
            b = %corners[1],
            c = %corners[2],
            scale = config.sentinel_scale,
            "created sentinel triangle"
        );

        Ok(Self {
            kernel,
            config,
            vertices,
            insertion_order: Vec::new(),
            sentinels,
            triangles,
            last_triangle: seed,
            bounds,
            stats: TriangulationStatistics::default(),
        })
    }

    /// Triangulates `points` with the given kernel.
    ///
    /// # Errors
    ///
    /// See [`Triangulation::from_points`].
    pub fn from_points_with_kernel(
        kernel: K,
        points: &[Point],
        config: TriangulationConfig,
    ) -> Result<Self, TriangulationConstructionError> {
        for (index, point) in points.iter().enumerate() {
            point
                .validate()
                .map_err(|err| TriangulationConstructionError::FailedToAddVertex {
                    index,
                    source: err.into(),
                })?;
        }
        if points.len() >= 3 && all_collinear(&kernel, points) {
            return Err(DegeneracyError::CollinearInput {
                count: points.len(),
            }
            .into());
        }

        let bounds = BoundingBox::from_points(points).unwrap_or_default();
        let mut tri = Self::with_kernel(kernel, bounds, config)?;
        for (index, point) in points.iter().enumerate() {
            tri.insert(*point)
                .map_err(|source| TriangulationConstructionError::FailedToAddVertex {
                    index,
                    source,
                })?;
        }

        debug!(
            points = points.len(),
            vertices = tri.number_of_vertices(),
            triangles = tri.number_of_triangles(),
            flips = tri.stats.flips,
            "triangulation built"
        );
        Ok(tri)
    }

    // =========================================================================
    // INSERTION AND LOCATION
    // =========================================================================

    /// Inserts a point.
    ///
    /// # Errors
    ///
    /// See [`InsertionError`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::prelude::*;
    ///
    /// let mut tri = Triangulation::new(BoundingBox::unit()).unwrap();
    /// tri.insert(Point::new(0.2, 0.2)).unwrap();
    /// tri.insert(Point::new(0.8, 0.3)).unwrap();
    ///
    /// let err = tri.insert(Point::new(0.2, 0.2)).unwrap_err();
    /// assert!(err.is_degenerate());
    /// assert_eq!(tri.number_of_vertices(), 2);
    /// ```
    pub fn insert(&mut self, point: Point) -> Result<InsertionOutcome, InsertionError> {
        insertion::insert(self, point).map(|(outcome, _)| outcome)
    }

    /// Inserts a point and returns the per-insertion counters.
    ///
    /// # Errors
    ///
    /// See [`InsertionError`].
    pub fn insert_with_statistics(
        &mut self,
        point: Point,
    ) -> Result<(InsertionOutcome, InsertionStatistics), InsertionError> {
        insertion::insert(self, point)
    }

    /// Locates `point`, walking from the most recently created triangle.
    ///
    /// # Errors
    ///
    /// See [`LocateError`].
    pub fn locate(&self, point: &Point) -> Result<LocateResult, LocateError> {
        locate::locate(self, point, None).map(|walk| walk.result)
    }

    /// Locates `point`, walking from `hint` if it is live.
    ///
    /// # Errors
    ///
    /// See [`LocateError`].
    pub fn locate_from(
        &self,
        point: &Point,
        hint: Option<TriangleKey>,
    ) -> Result<Walk, LocateError> {
        locate::locate(self, point, hint)
    }

    /// Locates `point` and records the walk.
    ///
    /// # Errors
    ///
    /// See [`LocateError`].
    pub fn locate_with_trace(
        &self,
        point: &Point,
        hint: Option<TriangleKey>,
    ) -> Result<(Walk, WalkTrace), LocateError> {
        locate::locate_with_trace(self, point, hint)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Number of real (non-sentinel) vertices.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.insertion_order.len()
    }

    /// Number of live triangles, sentinel triangles included.
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Real vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexKey, &Vertex)> {
        self.insertion_order
            .iter()
            .filter_map(|&key| self.vertices.get(key).map(|vertex| (key, vertex)))
    }

    /// Real points in insertion order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.vertices().map(|(_, vertex)| *vertex.point())
    }

    /// Looks up a vertex, sentinels included.
    #[must_use]
    pub fn vertex(&self, key: VertexKey) -> Option<&Vertex> {
        self.vertices.get(key)
    }

    /// Live triangles, in arena order.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleKey, &Triangle)> {
        self.triangles.iter()
    }

    /// Looks up a triangle.
    #[must_use]
    pub fn triangle(&self, key: TriangleKey) -> Option<&Triangle> {
        self.triangles.get(key)
    }

    /// Returns `true` if `key` refers to a live triangle.
    #[must_use]
    pub fn contains_triangle(&self, key: TriangleKey) -> bool {
        self.triangles.contains_key(key)
    }

    /// The three sentinel vertices.
    #[must_use]
    pub const fn sentinels(&self) -> [VertexKey; 3] {
        self.sentinels
    }

    /// Coordinates of the sentinel vertices, counter-clockwise.
    #[must_use]
    pub fn sentinel_points(&self) -> [Point; 3] {
        self.sentinels
            .map(|s| self.vertices.get(s).map_or_else(Point::default, |v| *v.point()))
    }

    /// Returns `true` if `key` is a sentinel vertex.
    #[must_use]
    pub fn is_sentinel(&self, key: VertexKey) -> bool {
        self.sentinels.contains(&key)
    }

    /// Index of `key` among the real points (first inserted is `0`), or
    /// `None` for sentinels and unknown keys.
    #[must_use]
    pub fn point_index(&self, key: VertexKey) -> Option<usize> {
        self.vertices.get(key).and_then(Vertex::point_index)
    }

    /// Triangle to start the next walk from.
    #[must_use]
    pub const fn hint(&self) -> TriangleKey {
        self.last_triangle
    }

    /// Bounding box the sentinels were sized for.
    #[must_use]
    pub const fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &TriangulationConfig {
        &self.config
    }

    /// Kernel evaluating the predicates.
    #[must_use]
    pub const fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Cumulative counters.
    #[must_use]
    pub const fn statistics(&self) -> TriangulationStatistics {
        self.stats
    }

    /// Clears the cumulative counters.
    pub fn reset_statistics(&mut self) {
        self.stats = TriangulationStatistics::default();
    }

    // =========================================================================
    // GEOMETRY
    // =========================================================================

    /// Corner coordinates of a triangle, counter-clockwise.
    #[must_use]
    pub fn triangle_points(&self, key: TriangleKey) -> Option<[Point; 3]> {
        let [a, b, c] = *self.triangles.get(key)?.vertices();
        Some([
            *self.vertices.get(a)?.point(),
            *self.vertices.get(b)?.point(),
            *self.vertices.get(c)?.point(),
        ])
    }

    /// Circumcircle of a triangle, computed once and cached until the
    /// triangle's corners change.
    #[must_use]
    pub fn circumcircle(&self, key: TriangleKey) -> Option<Circumcircle> {
        let triangle = self.triangles.get(key)?;
        *triangle.circumcircle_cache().get_or_init(|| {
            let [a, b, c] = self.triangle_points(key)?;
            circumcircle(&a, &b, &c).ok()
        })
    }

    /// Area of a triangle.
    #[must_use]
    pub fn area(&self, key: TriangleKey) -> Option<f64> {
        self.triangle_points(key)
            .map(|[a, b, c]| triangle_area(&a, &b, &c))
    }

    /// Sum of the areas of all live triangles.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.triangles.keys().filter_map(|t| self.area(t)).sum()
    }

    /// Area of the sentinel triangle.
    #[must_use]
    pub fn sentinel_area(&self) -> f64 {
        let [a, b, c] = self.sentinel_points();
        triangle_area(&a, &b, &c)
    }

    // =========================================================================
    // DERIVED OUTPUT
    // =========================================================================

    /// Edges between real points, by point index, sorted.
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        edge::edges(self)
    }

    /// Every edge, sentinel edges included.
    #[must_use]
    pub fn all_edges(&self) -> Vec<EdgeKey> {
        edge::all_edges(self)
    }

    /// Triangles as plain records, sorted by vertex identifiers.
    ///
    /// With `include_sentinels == false` only triangles inside the hull of
    /// the real points are returned.
    #[must_use]
    pub fn triangle_records(&self, include_sentinels: bool) -> Vec<TriangleRecord> {
        let mut records: Vec<TriangleRecord> = self
            .triangles
            .keys()
            .filter_map(|t| {
                let interior = self.is_inside_hull(t);
                if !include_sentinels && !interior {
                    return None;
                }
                let [a, b, c] = *self.triangles.get(t)?.vertices();
                Some(TriangleRecord {
                    vertex_ids: [
                        self.vertices.get(a)?.id(),
                        self.vertices.get(b)?.id(),
                        self.vertices.get(c)?.id(),
                    ],
                    corners: self.triangle_points(t)?,
                    interior,
                })
            })
            .collect();
        records.sort_by_key(|record| record.vertex_ids);
        records
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Runs every check, Delaunay included.
    ///
    /// # Errors
    ///
    /// Returns the first failure.
    pub fn validate(&self) -> Result<(), TriangulationValidationError> {
        validation::validate_structure(self)?;
        validation::validate_delaunay(self)
    }

    /// Runs the structural checks (adjacency, incidence, orientation).
    ///
    /// # Errors
    ///
    /// Returns the first failure.
    pub fn validate_structure(&self) -> Result<(), TriangulationValidationError> {
        validation::validate_structure(self)
    }

    /// Checks mutual adjacency.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency.
    pub fn validate_neighbors(&self) -> Result<(), TriangulationValidationError> {
        validation::validate_neighbors(self)
    }

    /// Checks vertex `first` references.
    ///
    /// # Errors
    ///
    /// Returns the first bad reference.
    pub fn validate_vertex_incidence(&self) -> Result<(), TriangulationValidationError> {
        validation::validate_vertex_incidence(self)
    }

    /// Checks that every triangle is counter-clockwise.
    ///
    /// # Errors
    ///
    /// Returns the first bad triangle.
    pub fn validate_orientation(&self) -> Result<(), TriangulationValidationError> {
        validation::validate_orientation(self)
    }

    /// Checks the empty-circumcircle property globally.
    ///
    /// # Errors
    ///
    /// Returns the first violation.
    pub fn validate_delaunay(&self) -> Result<(), TriangulationValidationError> {
        validation::validate_delaunay(self)
    }

    /// Returns `true` if every check passes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Runs every check and collects all failures.
    #[must_use]
    pub fn validation_report(&self, options: ValidationOptions) -> TriangulationValidationReport {
        validation::validation_report(self, options)
    }
}

/// Returns `true` if every point lies on one line (coincident points
/// included).
fn all_collinear<K: Kernel>(kernel: &K, points: &[Point]) -> bool {
    let Some((first, rest)) = points.split_first() else {
        return true;
    };
    let Some(second) = rest.iter().find(|p| *p != first) else {
        return true;
    };
    rest.iter()
        .all(|p| kernel.orientation(first, second, p) == 0.0)
}
