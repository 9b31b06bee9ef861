// SPDX-License-Identifier: GPL-3.0-only

//! Camera intrinsics and their rescaling to the depth map resolution

use glam::Mat3;
use serde::{Deserialize, Serialize};

/// Pinhole intrinsics (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl CameraIntrinsics {
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Read fx, fy, cx, cy out of a column-major 3x3 intrinsic matrix
    ///
    /// ```text
    /// | fx  0  cx |
    /// |  0 fy  cy |
    /// |  0  0   1 |
    /// ```
    pub fn from_matrix(m: &Mat3) -> Self {
        Self {
            fx: m.x_axis.x,
            fy: m.y_axis.y,
            cx: m.z_axis.x,
            cy: m.z_axis.y,
        }
    }

    /// Column-major 3x3 matrix form
    pub fn to_matrix(&self) -> Mat3 {
        Mat3::from_cols_array(&[
            self.fx, 0.0, 0.0, //
            0.0, self.fy, 0.0, //
            self.cx, self.cy, 1.0,
        ])
    }

    /// Rescale intrinsics calibrated at the image resolution to the depth resolution
    ///
    /// Returns None when any dimension is zero; callers treat that as a
    /// missing depth frame and skip projection.
    pub fn adjust_to_depth(
        &self,
        image_width: u32,
        image_height: u32,
        depth_width: u32,
        depth_height: u32,
    ) -> Option<AdjustedIntrinsics> {
        if image_width == 0 || image_height == 0 || depth_width == 0 || depth_height == 0 {
            return None;
        }

        let scale_x = image_width as f32 / depth_width as f32;
        let scale_y = image_height as f32 / depth_height as f32;

        Some(AdjustedIntrinsics {
            fx: self.fx / scale_x,
            fy: self.fy / scale_y,
            cx: self.cx / scale_x,
            cy: self.cy / scale_y,
            depth_width,
            depth_height,
        })
    }
}

/// Intrinsics expressed in depth map pixels
///
/// Only produced by [`CameraIntrinsics::adjust_to_depth`] and tied to the
/// depth resolution it was computed for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedIntrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
    depth_width: u32,
    depth_height: u32,
}

impl AdjustedIntrinsics {
    /// Depth resolution these intrinsics are valid for
    pub fn depth_resolution(&self) -> (u32, u32) {
        (self.depth_width, self.depth_height)
    }
}
