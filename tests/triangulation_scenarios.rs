//! End-to-end construction scenarios on small, hand-checked inputs.
//!
//! Coverage includes:
//! - Triangle and edge counts for convex and interior configurations
//! - Edge splits on interior and co-circular inputs
//! - Point location results (inside, on edge, on vertex, outside)
//! - Hull queries and exported records

use approx::assert_relative_eq;
use planar_delaunay::prelude::*;

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

fn square() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ]
}

// =============================================================================
// COUNTS
// =============================================================================

#[test]
fn square_has_two_interior_triangles() {
    init_tracing();
    let tri = Triangulation::from_points(&square()).unwrap();

    assert_eq!(tri.number_of_vertices(), 4);
    assert_eq!(tri.number_of_triangles(), 9);
    assert_eq!(tri.interior_triangles().len(), 2);
    assert_eq!(tri.edges().len(), 5);
    assert_eq!(
        tri.hull_edges(),
        vec![
            Edge::new(0, 1),
            Edge::new(0, 3),
            Edge::new(1, 2),
            Edge::new(2, 3),
        ]
    );
    assert!(tri.validate().is_ok());

    let interior_area: f64 = tri
        .interior_triangles()
        .into_iter()
        .filter_map(|t| tri.area(t))
        .sum();
    assert_relative_eq!(interior_area, 100.0, epsilon = 1e-9);
}

#[test]
fn square_center_splits_the_diagonal() {
    init_tracing();
    let mut tri = Triangulation::from_points(&square()).unwrap();

    let location = tri.locate(&Point::new(5.0, 5.0)).unwrap();
    assert!(matches!(location, LocateResult::OnEdge(..)));

    let (outcome, stats) = tri.insert_with_statistics(Point::new(5.0, 5.0)).unwrap();
    assert!(outcome.is_inserted());
    assert_eq!(stats.split, Some(SplitKind::Edge));
    assert_eq!(stats.triangles_created(), 4);

    assert_eq!(tri.number_of_vertices(), 5);
    assert_eq!(tri.number_of_triangles(), 11);
    assert_eq!(tri.interior_triangles().len(), 4);
    assert_eq!(tri.edges().len(), 8);
    assert!(tri.validate().is_ok());

    // The center connects to every corner.
    for corner in 0..4 {
        assert!(tri.edges().contains(&Edge::new(corner, 4)));
    }
}

#[test]
fn two_points_share_an_edge() {
    let tri = Triangulation::from_points(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).unwrap();
    assert_eq!(tri.number_of_triangles(), 5);
    assert!(tri.interior_triangles().is_empty());
    assert_eq!(tri.edges(), vec![Edge::new(0, 1)]);
    assert!(tri.validate().is_ok());
}

#[test]
fn empty_input_keeps_the_sentinel_triangle() {
    let tri = Triangulation::from_points(&[]).unwrap();
    assert_eq!(tri.number_of_vertices(), 0);
    assert_eq!(tri.number_of_triangles(), 1);
    assert!(tri.edges().is_empty());
    assert_eq!(tri.all_edges().len(), 3);
    assert_relative_eq!(tri.total_area(), tri.sentinel_area(), max_relative = 1e-12);
}

#[test]
fn regular_polygon_with_center() {
    init_tracing();
    let n = 12;
    let mut points: Vec<Point> = (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * f64::from(i) / f64::from(n);
            Point::new(angle.cos(), angle.sin())
        })
        .collect();
    points.push(Point::new(0.0, 0.0));

    let tri = Triangulation::from_points(&points).unwrap();
    assert_eq!(tri.number_of_triangles(), 2 * points.len() + 1);
    assert_eq!(tri.interior_triangles().len(), 12);
    assert_eq!(tri.hull_edges().len(), 12);
    assert!(tri.validate_structure().is_ok());
    assert!(tri.validate_delaunay().is_ok());
}

// =============================================================================
// LOCATION
// =============================================================================

#[test]
fn locate_classifies_positions() {
    let tri = Triangulation::from_points(&square()).unwrap();

    assert!(matches!(
        tri.locate(&Point::new(1.0, 5.0)).unwrap(),
        LocateResult::Inside(_)
    ));
    assert!(matches!(
        tri.locate(&Point::new(5.0, 0.0)).unwrap(),
        LocateResult::OnEdge(..)
    ));

    let LocateResult::OnVertex(t, corner) = tri.locate(&Point::new(10.0, 10.0)).unwrap() else {
        panic!("expected a vertex hit");
    };
    let v = tri.triangle(t).unwrap().vertex(usize::from(corner));
    assert_eq!(tri.point_index(v), Some(2));

    assert!(matches!(
        tri.locate(&Point::new(1.0e9, 1.0e9)),
        Err(LocateError::OutsideTriangulation { .. })
    ));
}

#[test]
fn locate_trace_ends_at_the_containing_triangle() {
    let points: Vec<Point> = (0..30)
        .map(|i| {
            let t = f64::from(i);
            Point::new((t * 0.73).sin() * 10.0, (t * 1.31).cos() * 10.0)
        })
        .collect();
    let tri = Triangulation::from_points(&points).unwrap();

    let target = Point::new(0.1, -0.2);
    let (walk, trace) = tri.locate_with_trace(&target, None).unwrap();
    assert_eq!(trace.visited.last().copied(), Some(walk.result.triangle()));
    assert_eq!(trace.visited.len(), trace.centers.len());
    assert_eq!(trace.visited.len(), walk.steps);

    let from_hint = tri.locate_from(&target, Some(walk.result.triangle())).unwrap();
    assert_eq!(from_hint.result, walk.result);
    assert_eq!(from_hint.steps, 1);
}

// =============================================================================
// OUTPUT
// =============================================================================

#[test]
fn triangle_records_serialize_to_json() {
    let tri = Triangulation::from_points(&[
        Point::new(0.0, 0.0),
        Point::new(2.0, 0.0),
        Point::new(1.0, 2.0),
    ])
    .unwrap();

    let records = tri.triangle_records(false);
    assert_eq!(records.len(), 1);
    let mut ids = records[0].vertex_ids;
    ids.sort_unstable();
    assert_eq!(ids, [3, 4, 5]);
    assert!(records[0].interior);

    let json = serde_json::to_string(&records).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(parsed[0]["corners"].is_array());
    assert_eq!(parsed[0]["interior"], serde_json::Value::Bool(true));

    let back: Vec<TriangleRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, records);

    let all = tri.triangle_records(true);
    assert_eq!(all.len(), tri.number_of_triangles());
    assert_eq!(all.iter().filter(|record| record.interior).count(), 1);
}

#[test]
fn config_round_trips_through_json() {
    let config = TriangulationConfigBuilder::default()
        .sentinel_scale(50.0)
        .duplicate_policy(DuplicatePolicy::Skip)
        .build()
        .unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let back: TriangulationConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);

    let partial: TriangulationConfig =
        serde_json::from_str(r#"{"validate_after_insert":true}"#).unwrap();
    assert!(partial.validate_after_insert);
    assert_eq!(partial.duplicate_policy, DuplicatePolicy::Reject);
}
