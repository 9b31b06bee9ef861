// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for depth sensor sources

use crate::depth::{CameraIntrinsics, DepthMap};
use glam::{Mat3, Mat4};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// One sensor tick: depth plane (if any), calibration and pose
#[derive(Debug, Clone)]
pub struct SensorFrame {
    /// Depth plane in meters; None when the sensor delivered no depth this tick
    pub depth: Option<DepthMap>,
    /// Column-major 3x3 intrinsic matrix calibrated at the image resolution
    pub intrinsics: Mat3,
    /// Capture image width the intrinsics refer to
    pub image_width: u32,
    /// Capture image height the intrinsics refer to
    pub image_height: u32,
    /// Camera-to-world transform for this frame
    pub inverse_view: Mat4,
    /// When the frame was captured
    pub captured_at: Instant,
}

impl SensorFrame {
    pub fn new(
        depth: Option<DepthMap>,
        intrinsics: CameraIntrinsics,
        image_width: u32,
        image_height: u32,
        inverse_view: Mat4,
    ) -> Self {
        Self {
            depth,
            intrinsics: intrinsics.to_matrix(),
            image_width,
            image_height,
            inverse_view,
            captured_at: Instant::now(),
        }
    }

    /// Raw intrinsics as delivered by the sensor
    pub fn camera_intrinsics(&self) -> CameraIntrinsics {
        CameraIntrinsics::from_matrix(&self.intrinsics)
    }
}

/// Camera calibration and pose stored next to a depth file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraMetadata {
    /// Capture image width the intrinsics were calibrated at
    pub image_width: u32,
    /// Capture image height the intrinsics were calibrated at
    pub image_height: u32,
    /// Column-major 3x3 intrinsic matrix
    pub intrinsics: Mat3,
    /// Column-major 4x4 camera-to-world matrix
    #[serde(default = "identity_pose")]
    pub inverse_view: Mat4,
    /// Resolution of raw float depth dumps (images carry their own)
    #[serde(default)]
    pub depth_width: Option<u32>,
    #[serde(default)]
    pub depth_height: Option<u32>,
}

fn identity_pose() -> Mat4 {
    Mat4::IDENTITY
}
