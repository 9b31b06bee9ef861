// SPDX-License-Identifier: GPL-3.0-only

//! Ray-cast test scene
//!
//! A sphere floating in front of a wall, seen by a camera that yaws back and
//! forth around the world origin. Produces metric depth at the reference
//! sensor's depth resolution with the reference intrinsics, so frames look
//! like a real handheld capture to the rest of the pipeline.

use super::{DepthSource, SensorFrame};
use crate::constants::reference_sensor;
use crate::depth::{AdjustedIntrinsics, CameraIntrinsics, DepthMap};
use crate::errors::PointCloudError;
use glam::{Mat4, Vec3};
use tracing::debug;

/// Distance of the wall from the world origin along -Z
const WALL_DISTANCE: f32 = 3.0;
const SPHERE_CENTER: Vec3 = Vec3::new(0.0, 0.0, -2.0);
const SPHERE_RADIUS: f32 = 0.5;
/// Peak yaw of the camera swing, in radians
const SWING_AMPLITUDE: f32 = 0.3;
/// Yaw phase advance per frame
const SWING_RATE: f32 = 0.05;

pub struct SyntheticDepthSource {
    intrinsics: CameraIntrinsics,
    depth_intrinsics: AdjustedIntrinsics,
    depth_width: u32,
    depth_height: u32,
    frame_index: u64,
    frame_limit: Option<u64>,
    drop_every: Option<u64>,
}

impl SyntheticDepthSource {
    /// Scene rendered at the given depth resolution
    pub fn new(depth_width: u32, depth_height: u32) -> Result<Self, String> {
        let intrinsics = CameraIntrinsics::new(
            reference_sensor::FX,
            reference_sensor::FY,
            reference_sensor::CX,
            reference_sensor::CY,
        );
        let depth_intrinsics = intrinsics
            .adjust_to_depth(
                reference_sensor::IMAGE_WIDTH,
                reference_sensor::IMAGE_HEIGHT,
                depth_width,
                depth_height,
            )
            .ok_or_else(|| format!("Invalid depth resolution {}x{}", depth_width, depth_height))?;

        Ok(Self {
            intrinsics,
            depth_intrinsics,
            depth_width,
            depth_height,
            frame_index: 0,
            frame_limit: None,
            drop_every: None,
        })
    }

    /// Stop after `frames` frames
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Deliver no depth on every `n`th frame (frame numbers n, 2n, ...)
    pub fn with_drop_every(mut self, n: u64) -> Self {
        self.drop_every = (n > 0).then_some(n);
        self
    }

    /// Camera-to-world pose for a frame
    pub fn pose_for(frame_index: u64) -> Mat4 {
        let yaw = (frame_index as f32 * SWING_RATE).sin() * SWING_AMPLITUDE;
        Mat4::from_rotation_y(yaw)
    }

    fn render(&self, inverse_view: &Mat4) -> Result<DepthMap, PointCloudError> {
        let k = &self.depth_intrinsics;
        let mut data = Vec::with_capacity((self.depth_width * self.depth_height) as usize);
        let origin = inverse_view.transform_point3(Vec3::ZERO);

        for y in 0..self.depth_height {
            for x in 0..self.depth_width {
                // Camera-space ray with unit -Z, so the hit parameter is the z-depth
                let ray = Vec3::new(
                    (x as f32 - k.cx) / k.fx,
                    -(y as f32 - k.cy) / k.fy,
                    -1.0,
                );
                let direction = inverse_view.transform_vector3(ray);
                data.push(cast(origin, direction).unwrap_or(0.0));
            }
        }

        DepthMap::new(self.depth_width, self.depth_height, data)
    }
}

/// Nearest hit parameter along `direction`, if any
fn cast(origin: Vec3, direction: Vec3) -> Option<f32> {
    let sphere = {
        let oc = origin - SPHERE_CENTER;
        let a = direction.length_squared();
        let b = oc.dot(direction);
        let c = oc.length_squared() - SPHERE_RADIUS * SPHERE_RADIUS;
        let disc = b * b - a * c;
        (disc >= 0.0)
            .then(|| (-b - disc.sqrt()) / a)
            .filter(|t| *t > 0.0)
    };

    let wall = (direction.z < 0.0)
        .then(|| (-WALL_DISTANCE - origin.z) / direction.z)
        .filter(|t| *t > 0.0);

    match (sphere, wall) {
        (Some(s), Some(w)) => Some(s.min(w)),
        (s, w) => s.or(w),
    }
}

impl DepthSource for SyntheticDepthSource {
    fn next_frame(&mut self) -> Option<SensorFrame> {
        if self.frame_limit.is_some_and(|limit| self.frame_index >= limit) {
            return None;
        }
        self.frame_index += 1;

        let inverse_view = Self::pose_for(self.frame_index);
        let dropped = self
            .drop_every
            .is_some_and(|n| self.frame_index % n == 0);

        let depth = if dropped {
            debug!(frame = self.frame_index, "Synthetic frame without depth");
            None
        } else {
            self.render(&inverse_view).ok()
        };

        Some(SensorFrame::new(
            depth,
            self.intrinsics,
            reference_sensor::IMAGE_WIDTH,
            reference_sensor::IMAGE_HEIGHT,
            inverse_view,
        ))
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
