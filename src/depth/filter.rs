// SPDX-License-Identifier: GPL-3.0-only

//! Optional depth validity stage
//!
//! Projection itself never rejects a depth. When enabled in the config, this
//! stage runs before projection and cells outside the range keep the
//! off-screen sentinel instead of a degenerate point.

use serde::{Deserialize, Serialize};

/// Accepted metric depth range (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthFilter {
    pub min_depth: f32,
    pub max_depth: f32,
}

impl DepthFilter {
    pub fn new(min_depth: f32, max_depth: f32) -> Self {
        Self {
            min_depth,
            max_depth,
        }
    }

    /// NaN never passes
    pub fn accepts(&self, depth: f32) -> bool {
        depth >= self.min_depth && depth <= self.max_depth
    }
}

impl Default for DepthFilter {
    fn default() -> Self {
        // Anything strictly in front of the camera, up to sensor range
        Self {
            min_depth: f32::MIN_POSITIVE,
            max_depth: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rejects_non_positive() {
        let filter = DepthFilter::default();
        assert!(!filter.accepts(0.0));
        assert!(!filter.accepts(-1.0));
        assert!(!filter.accepts(f32::NAN));
        assert!(filter.accepts(0.5));
        assert!(!filter.accepts(12.0));
    }

    #[test]
    fn test_range_inclusive() {
        let filter = DepthFilter::new(0.4, 4.0);
        assert!(filter.accepts(0.4));
        assert!(filter.accepts(4.0));
        assert!(!filter.accepts(0.39));
    }
}
