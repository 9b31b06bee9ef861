// SPDX-License-Identifier: GPL-3.0-only

//! Inverse pinhole back-projection

use super::AdjustedIntrinsics;
use glam::{Mat4, Vec2, Vec3};

/// Back-project a depth map pixel into world space
///
/// Camera space is right-handed with forward along -Z and image Y pointing
/// down, so the image-space Y offset is negated. Zero or negative depths are
/// not rejected here; they collapse onto the camera center line.
pub fn unproject_to_world(
    pixel: Vec2,
    depth: f32,
    intrinsics: &AdjustedIntrinsics,
    inverse_view: &Mat4,
) -> Vec3 {
    let xr = (pixel.x - intrinsics.cx) * depth / intrinsics.fx;
    let yr = (pixel.y - intrinsics.cy) * depth / intrinsics.fy;

    let local = Vec3::new(xr, -yr, -depth);
    inverse_view.transform_point3(local)
}
