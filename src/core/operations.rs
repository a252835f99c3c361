//! Outcomes and telemetry for triangulation operations.
//!
//! This module defines what an insertion did, not how. The algorithms live
//! under `core::algorithms`.

use serde::{Deserialize, Serialize};

use crate::core::collections::{TriangleKey, VertexKey};

/// How the triangle set was subdivided to admit a new vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitKind {
    /// Point strictly inside a triangle: one triangle becomes three.
    Interior,
    /// Point on an edge shared by two triangles: two become four.
    Edge,
    /// Point on an edge of the outer sentinel triangle: one becomes two.
    HullEdge,
}

impl SplitKind {
    /// Number of triangles removed by the split.
    #[must_use]
    pub const fn removed(self) -> usize {
        match self {
            Self::Interior | Self::HullEdge => 1,
            Self::Edge => 2,
        }
    }

    /// Number of triangles created by the split.
    #[must_use]
    pub const fn created(self) -> usize {
        match self {
            Self::Interior => 3,
            Self::Edge => 4,
            Self::HullEdge => 2,
        }
    }
}

/// Result of an insertion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertionResult {
    /// The vertex was inserted.
    #[default]
    Inserted,
    /// The point coincided with an existing vertex and was skipped.
    SkippedDuplicate,
}

/// Counters for a single insertion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertionStatistics {
    /// Triangles visited by the walk, including the final one.
    pub walk_steps: usize,
    /// Orientation tests performed by the walk.
    pub orientation_tests: usize,
    /// In-circle tests performed during legalization.
    pub in_circle_tests: usize,
    /// Edge flips performed during legalization.
    pub flips: usize,
    /// Split performed, if the point was inserted.
    pub split: Option<SplitKind>,
    /// Result of the insertion attempt.
    pub result: InsertionResult,
}

impl InsertionStatistics {
    /// Returns `true` if the insertion succeeded.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.result, InsertionResult::Inserted)
    }

    /// Returns `true` if the point was skipped as a duplicate.
    #[must_use]
    pub const fn skipped_duplicate(&self) -> bool {
        matches!(self.result, InsertionResult::SkippedDuplicate)
    }

    /// Triangles created by the split (flips create none).
    #[must_use]
    pub const fn triangles_created(&self) -> usize {
        match self.split {
            Some(kind) => kind.created(),
            None => 0,
        }
    }
}

/// Outcome of a single-point insertion.
///
/// Failures that abort the insertion are returned as
/// `Err(InsertionError)` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionOutcome {
    /// The point was inserted.
    Inserted {
        /// Key of the new vertex.
        vertex_key: VertexKey,
        /// Triangle to start the next walk from.
        hint: Option<TriangleKey>,
    },
    /// The point coincided with an existing vertex and the triangulation was
    /// left unchanged.
    Skipped {
        /// The vertex already at that position.
        existing: VertexKey,
    },
}

impl InsertionOutcome {
    /// Key of the vertex at the inserted position, new or existing.
    #[must_use]
    pub const fn vertex_key(&self) -> VertexKey {
        match *self {
            Self::Inserted { vertex_key, .. } => vertex_key,
            Self::Skipped { existing } => existing,
        }
    }

    /// Returns `true` for [`InsertionOutcome::Inserted`].
    #[must_use]
    pub const fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }
}

/// Cumulative counters for a triangulation.
///
/// Held per instance; cleared with
/// [`Triangulation::reset_statistics`](crate::core::triangulation::Triangulation::reset_statistics).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriangulationStatistics {
    /// Successful insertions.
    pub insertions: usize,
    /// Duplicate points skipped.
    pub skipped: usize,
    /// Edge flips.
    pub flips: usize,
    /// In-circle tests.
    pub in_circle_tests: usize,
    /// Orientation tests performed by point location.
    pub orientation_tests: usize,
    /// Triangles visited by point location.
    pub walk_steps: usize,
}

impl TriangulationStatistics {
    /// Folds one insertion into the totals.
    pub const fn record(&mut self, stats: &InsertionStatistics) {
        match stats.result {
            InsertionResult::Inserted => self.insertions += 1,
            InsertionResult::SkippedDuplicate => self.skipped += 1,
        }
        self.flips += stats.flips;
        self.in_circle_tests += stats.in_circle_tests;
        self.orientation_tests += stats.orientation_tests;
        self.walk_steps += stats.walk_steps;
    }

    /// Mean triangles visited per insertion, or `0.0` before any insertion.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "counters stay far below 2^52 in practice"
    )]
    pub fn mean_walk_length(&self) -> f64 {
        let attempts = self.insertions + self.skipped;
        if attempts == 0 {
            0.0
        } else {
            self.walk_steps as f64 / attempts as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_kind_counts() {
        assert_eq!(SplitKind::Interior.created() - SplitKind::Interior.removed(), 2);
        assert_eq!(SplitKind::Edge.created() - SplitKind::Edge.removed(), 2);
        assert_eq!(SplitKind::HullEdge.created() - SplitKind::HullEdge.removed(), 1);
    }

    #[test]
    fn record_accumulates() {
        let mut totals = TriangulationStatistics::default();
        totals.record(&InsertionStatistics {
            walk_steps: 4,
            orientation_tests: 9,
            in_circle_tests: 5,
            flips: 2,
            split: Some(SplitKind::Interior),
            result: InsertionResult::Inserted,
        });
        totals.record(&InsertionStatistics {
            walk_steps: 2,
            orientation_tests: 3,
            result: InsertionResult::SkippedDuplicate,
            ..InsertionStatistics::default()
        });

        assert_eq!(totals.insertions, 1);
        assert_eq!(totals.skipped, 1);
        assert_eq!(totals.flips, 2);
        assert_eq!(totals.in_circle_tests, 5);
        assert_eq!(totals.orientation_tests, 12);
        assert_eq!(totals.walk_steps, 6);
        assert!((totals.mean_walk_length() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn insertion_statistics_flags() {
        let stats = InsertionStatistics {
            split: Some(SplitKind::Edge),
            ..InsertionStatistics::default()
        };
        assert!(stats.success());
        assert!(!stats.skipped_duplicate());
        assert_eq!(stats.triangles_created(), 4);
    }

    #[test]
    fn statistics_serialize() {
        let json = serde_json::to_value(TriangulationStatistics {
            flips: 3,
            ..TriangulationStatistics::default()
        })
        .unwrap();
        assert_eq!(json["flips"], 3);
        assert_eq!(json["insertions"], 0);
    }
}
