//! # planar-delaunay
//!
//! This is a library for computing the Delaunay triangulation of a set of
//! points in the plane by incremental insertion.
//!
//! # Features
//!
//! - Incremental construction inside a sentinel super-triangle sized from the
//!   input bounding box
//! - Point location by triangle walking, with optional walk traces
//! - Edge legalization by Lawson flips on an explicit work stack
//! - Exact orientation and in-circle predicates (adaptive precision)
//! - Hull queries, edge extraction, and structural/Delaunay validation
//! - Serialization/Deserialization of outputs with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use planar_delaunay::prelude::*;
//!
//! let points = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(10.0, 10.0),
//!     Point::new(0.0, 10.0),
//! ];
//!
//! let tri = Triangulation::from_points(&points).unwrap();
//!
//! assert_eq!(tri.number_of_vertices(), 4);
//! assert_eq!(tri.interior_triangles().len(), 2);
//! assert_eq!(tri.edges().len(), 5);
//! assert!(tri.validate_delaunay().is_ok());
//! ```
//!
//! Points can also be inserted one at a time into a triangulation sized for
//! a known region:
//!
//! ```rust
//! use planar_delaunay::prelude::*;
//!
//! let bounds = BoundingBox::new(Point::new(-1.0, -1.0), Point::new(1.0, 1.0));
//! let mut tri = Triangulation::new(bounds).unwrap();
//!
//! for (x, y) in [(0.0, 0.0), (0.5, 0.1), (-0.3, 0.7), (0.2, -0.9)] {
//!     tri.insert(Point::new(x, y)).unwrap();
//! }
//!
//! // Each insertion strictly inside the sentinel triangle adds two triangles.
//! assert_eq!(tri.number_of_triangles(), 2 * 4 + 1);
//! assert!(tri.is_valid());
//! ```
//!
//! # Invariants
//!
//! After every successful insertion:
//!
//! - adjacency is mutual and consistent with corner order
//!   ([`validate_neighbors`](core::validation::validate_neighbors));
//! - every vertex references a live incident triangle
//!   ([`validate_vertex_incidence`](core::validation::validate_vertex_incidence));
//! - every triangle is strictly counter-clockwise
//!   ([`validate_orientation`](core::validation::validate_orientation));
//! - no vertex lies strictly inside any circumcircle
//!   ([`validate_delaunay`](core::validation::validate_delaunay)).
//!
//! Duplicate, non-finite, and out-of-bounds points are rejected before
//! anything is modified. See [`core::algorithms::insertion`] for details.
//!
//! # References
//!
//! - L. J. Guibas and J. Stolfi, "Primitives for the manipulation of general
//!   subdivisions and the computation of Voronoi diagrams", ACM TOG, 1985.
//! - J. R. Shewchuk, "Adaptive Precision Floating-Point Arithmetic and Fast
//!   Robust Geometric Predicates", Discrete & Computational Geometry, 1997.

#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// The `core` module contains the triangulation, its components, and the
/// algorithms that build and query it.
pub mod core {
    /// Triangulation algorithms for construction and querying
    pub mod algorithms {
        /// Edge legalization by Lawson flips
        pub mod flips;
        /// Incremental point insertion
        pub mod insertion;
        /// Point location by triangle walking
        pub mod locate;
    }
    pub mod boundary;
    /// Collection types and arena keys
    pub mod collections;
    pub mod config;
    pub mod edge;
    pub mod operations;
    pub mod triangle;
    pub mod triangulation;
    pub mod validation;
    pub mod vertex;

    // Re-export the `core` modules.
    pub use boundary::*;
    pub use config::*;
    pub use edge::*;
    pub use operations::*;
    pub use triangle::*;
    pub use triangulation::*;
    pub use vertex::*;
    // Note: collections module not re-exported here to avoid namespace pollution
}

/// Contains geometric types: the `Point` struct, bounding boxes, predicates,
/// and the kernel abstraction.
pub mod geometry {
    pub mod bounds;
    /// Geometric kernel abstraction
    pub mod kernel;
    pub mod point;
    pub mod predicates;

    pub use bounds::*;
    pub use kernel::*;
    pub use point::*;
    pub use predicates::*;
}

/// A prelude module that re-exports commonly used types.
pub mod prelude {
    pub use crate::core::algorithms::insertion::{DegeneracyError, InsertionError};
    pub use crate::core::algorithms::locate::{LocateError, LocateResult, Walk, WalkTrace};
    pub use crate::core::{
        boundary::*, config::*, edge::*, operations::*, triangle::*, triangulation::*,
        validation::*, vertex::*,
    };

    pub use crate::core::collections::{
        FastHashSet, SmallBuffer, TriangleKey, VertexKey, fast_hash_set_with_capacity,
    };

    pub use crate::geometry::{bounds::*, kernel::*, point::*, predicates::*};
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{
        core::{triangle::Triangle, triangulation::Triangulation, vertex::Vertex},
        geometry::{kernel::FastKernel, point::Point},
        is_normal,
    };

    #[test]
    fn normal_types() {
        assert!(is_normal::<Point>());
        assert!(is_normal::<Vertex>());
        assert!(is_normal::<Triangle>());
        assert!(is_normal::<Triangulation>());
        assert!(is_normal::<Triangulation<FastKernel>>());
    }

    #[test]
    fn test_prelude_exports() {
        use crate::prelude::*;

        let mut set: FastHashSet<u64> = FastHashSet::default();
        assert!(set.insert(123));
        assert!(set.contains(&123));

        let mut buffer: SmallBuffer<i32, 8> = SmallBuffer::new();
        buffer.push(42);
        assert_eq!(buffer.len(), 1);

        let set_with_cap = fast_hash_set_with_capacity::<u64>(50);
        assert!(set_with_cap.capacity() >= 50);

        let config = TriangulationConfigBuilder::default().build().unwrap();
        let tri = Triangulation::with_config(BoundingBox::unit(), config).unwrap();
        assert_eq!(tri.hint(), tri.triangles().next().unwrap().0);
        let area = orientation(
            &Point::new(0.0, 0.0),
            &Point::new(1.0, 0.0),
            &Point::new(0.0, 1.0),
        );
        assert!(area > 0.0);
    }
}
