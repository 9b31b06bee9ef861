// SPDX-License-Identifier: GPL-3.0-only

//! Depth lookup and grid-to-pixel mapping

use crate::errors::PointCloudError;
use std::sync::Arc;

/// Row-major depth buffer in meters
#[derive(Clone)]
pub struct DepthMap {
    width: u32,
    height: u32,
    data: Arc<[f32]>,
}

impl DepthMap {
    /// Wrap a depth buffer, checking its length against the resolution
    pub fn new(width: u32, height: u32, data: impl Into<Arc<[f32]>>) -> Result<Self, PointCloudError> {
        let data = data.into();
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(PointCloudError::InvalidDepthMap {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Depth map filled with one value
    pub fn filled(width: u32, height: u32, depth: f32) -> Self {
        Self {
            width,
            height,
            data: vec![depth; width as usize * height as usize].into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw row-major values
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// True when the map has no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Depth at pixel (x, y)
    ///
    /// # Panics
    /// If the coordinate lies outside the map. The grid mapping never produces
    /// such a coordinate, so hitting this is a logic bug.
    pub fn sample(&self, x: u32, y: u32) -> f32 {
        assert!(
            x < self.width && y < self.height,
            "depth sample ({}, {}) outside {}x{} map",
            x,
            y,
            self.width,
            self.height
        );
        self.data[y as usize * self.width as usize + x as usize]
    }
}

impl std::fmt::Debug for DepthMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DepthMap({}x{})", self.width, self.height)
    }
}

/// Maps grid cells onto depth map pixels for one depth resolution
///
/// Each cell samples its own center so no edge of the cell is favoured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSampler {
    horizontal_points: usize,
    vertical_points: usize,
    width: u32,
    height: u32,
    step_x: f32,
    step_y: f32,
}

impl GridSampler {
    pub fn new(horizontal_points: usize, vertical_points: usize, width: u32, height: u32) -> Self {
        let step_x = if horizontal_points > 0 {
            width as f32 / horizontal_points as f32
        } else {
            0.0
        };
        let step_y = if vertical_points > 0 {
            height as f32 / vertical_points as f32
        } else {
            0.0
        };

        Self {
            horizontal_points,
            vertical_points,
            width,
            height,
            step_x,
            step_y,
        }
    }

    /// Pixel sampled by grid cell (h, v)
    ///
    /// The rounded center is clamped so grids denser than the map stay in range.
    pub fn pixel_for(&self, h: usize, v: usize) -> (u32, u32) {
        debug_assert!(h < self.horizontal_points && v < self.vertical_points);

        let x = (h as f32 * self.step_x + self.step_x / 2.0).round() as u32;
        let y = (v as f32 * self.step_y + self.step_y / 2.0).round() as u32;

        (
            x.min(self.width.saturating_sub(1)),
            y.min(self.height.saturating_sub(1)),
        )
    }

    pub fn horizontal_points(&self) -> usize {
        self.horizontal_points
    }

    pub fn vertical_points(&self) -> usize {
        self.vertical_points
    }
}
