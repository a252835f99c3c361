//! Property-based tests for triangulations of random point sets.
//!
//! - Triangle count: `2n + 1` triangles for `n` points strictly inside the
//!   sentinel triangle
//! - Structural validity and the empty-circumcircle property
//! - Area conservation: live triangles tile the sentinel triangle
//! - Insertion-order robustness: the edge set does not depend on order

use approx::assert_relative_eq;
use planar_delaunay::prelude::*;
use proptest::prelude::*;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

fn finite_coordinate() -> impl Strategy<Value = f64> {
    (-100.0..100.0).prop_filter("must be finite", |x: &f64| x.is_finite())
}

fn point() -> impl Strategy<Value = Point> {
    (finite_coordinate(), finite_coordinate()).prop_map(|(x, y)| Point::new(x, y))
}

// Exact duplicates are rejected by default, so strip them up front.
fn dedup_points(points: Vec<Point>) -> Vec<Point> {
    let mut unique: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if !unique.iter().any(|u| u.bitwise_eq(&p)) {
            unique.push(p);
        }
    }
    unique
}

fn build(points: &[Point]) -> Option<Triangulation> {
    match Triangulation::from_points(points) {
        Ok(tri) => Some(tri),
        Err(TriangulationConstructionError::Degenerate(DegeneracyError::CollinearInput {
            ..
        })) => None,
        Err(err) => panic!("construction failed: {err}"),
    }
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_triangle_count(points in prop::collection::vec(point(), 0..40)) {
        let points = dedup_points(points);
        let Some(tri) = build(&points) else {
            return Ok(());
        };
        prop_assert_eq!(tri.number_of_vertices(), points.len());
        prop_assert_eq!(tri.number_of_triangles(), 2 * points.len() + 1);
        prop_assert_eq!(tri.all_edges().len(), 3 * points.len() + 3);
    }

    #[test]
    fn prop_triangulation_is_valid(points in prop::collection::vec(point(), 3..40)) {
        let points = dedup_points(points);
        let Some(tri) = build(&points) else {
            return Ok(());
        };
        prop_assert!(tri.validate_structure().is_ok());
        prop_assert!(tri.validate_delaunay().is_ok());
        prop_assert!(tri.validation_report(ValidationOptions::default()).is_empty());
    }

    #[test]
    fn prop_triangles_tile_the_sentinel(points in prop::collection::vec(point(), 1..30)) {
        let points = dedup_points(points);
        let Some(tri) = build(&points) else {
            return Ok(());
        };
        assert_relative_eq!(tri.total_area(), tri.sentinel_area(), max_relative = 1e-9);
    }

    #[test]
    fn prop_every_point_locates_on_its_vertex(points in prop::collection::vec(point(), 1..30)) {
        let points = dedup_points(points);
        let Some(tri) = build(&points) else {
            return Ok(());
        };
        for (index, p) in points.iter().enumerate() {
            let LocateResult::OnVertex(t, corner) = tri.locate(p).unwrap() else {
                return Err(TestCaseError::fail(format!("point {index} not found on a vertex")));
            };
            let v = tri.triangle(t).unwrap().vertex(usize::from(corner));
            prop_assert_eq!(tri.point_index(v), Some(index));
        }
    }

    #[test]
    fn prop_edges_independent_of_order(points in prop::collection::vec(point(), 3..25)) {
        let points = dedup_points(points);
        let Some(forward) = build(&points) else {
            return Ok(());
        };
        let reversed: Vec<Point> = points.iter().rev().copied().collect();
        let Some(backward) = build(&reversed) else {
            return Ok(());
        };

        let n = points.len();
        let mut remapped: Vec<Edge> = backward
            .edges()
            .into_iter()
            .map(|edge| Edge::new(n - 1 - edge.a, n - 1 - edge.b))
            .collect();
        remapped.sort_unstable();
        prop_assert_eq!(forward.edges(), remapped);
    }

    #[test]
    fn prop_duplicates_are_skipped(points in prop::collection::vec(point(), 3..20)) {
        let points = dedup_points(points);
        let config = TriangulationConfigBuilder::default()
            .duplicate_policy(DuplicatePolicy::Skip)
            .build()
            .unwrap();
        let mut doubled = points.clone();
        doubled.extend(points.iter().copied());

        let tri = match Triangulation::from_points_with_config(&doubled, config) {
            Ok(tri) => tri,
            Err(TriangulationConstructionError::Degenerate(_)) => return Ok(()),
            Err(err) => return Err(TestCaseError::fail(format!("{err}"))),
        };
        prop_assert_eq!(tri.number_of_vertices(), points.len());
        prop_assert_eq!(tri.statistics().skipped, points.len());
        prop_assert!(tri.is_valid());
    }
}
