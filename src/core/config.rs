//! Triangulation configuration.
//!
//! [`TriangulationConfig`] is built with [`TriangulationConfigBuilder`]; every
//! field has a default, so `TriangulationConfig::default()` is the usual
//! starting point.
//!
//! # Examples
//!
//! ```rust
//! use planar_delaunay::core::config::{DuplicatePolicy, TriangulationConfigBuilder};
//!
//! let config = TriangulationConfigBuilder::default()
//!     .sentinel_scale(50.0)
//!     .duplicate_policy(DuplicatePolicy::Skip)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.sentinel_scale, 50.0);
//! assert!(!config.validate_after_insert);
//!
//! assert!(TriangulationConfigBuilder::default().sentinel_scale(0.5).build().is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default inradius multiplier for the sentinel triangle.
pub const DEFAULT_SENTINEL_SCALE: f64 = 100.0;

/// What to do when an inserted point coincides with an existing vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Fail the insertion with a degenerate-geometry error.
    #[default]
    Reject,
    /// Leave the triangulation unchanged and report the existing vertex.
    Skip,
}

/// Options controlling construction and insertion.
#[derive(Builder, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[builder(default, build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct TriangulationConfig {
    /// Inradius of the sentinel triangle as a multiple of the bounding-box
    /// diagonal. Must be finite and at least 1.
    pub sentinel_scale: f64,
    /// Handling of coincident points.
    pub duplicate_policy: DuplicatePolicy,
    /// Run structural validation after every insertion.
    pub validate_after_insert: bool,
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self {
            sentinel_scale: DEFAULT_SENTINEL_SCALE,
            duplicate_policy: DuplicatePolicy::Reject,
            validate_after_insert: false,
        }
    }
}

/// Errors from configuration validation.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    /// `sentinel_scale` is not finite or is below 1.
    #[error("sentinel_scale must be finite and >= 1, got {scale}")]
    InvalidSentinelScale {
        /// The rejected value.
        scale: f64,
    },
}

impl TriangulationConfig {
    /// Checks the field constraints enforced by the builder.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_sentinel_scale(self.sentinel_scale)
    }
}

impl TriangulationConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        self.sentinel_scale
            .map_or(Ok(()), check_sentinel_scale)
            .map_err(|err| err.to_string())
    }
}

const fn check_sentinel_scale(scale: f64) -> Result<(), ConfigValidationError> {
    if scale.is_finite() && scale >= 1.0 {
        Ok(())
    } else {
        Err(ConfigValidationError::InvalidSentinelScale { scale })
    }
}
