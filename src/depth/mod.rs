// SPDX-License-Identifier: GPL-3.0-only

//! Depth map to world-space projection
//!
//! The per-cell math of the point cloud pipeline:
//! - [`intrinsics`]: rescale calibration intrinsics to the depth map resolution
//! - [`sampler`]: depth lookup and the grid-to-pixel mapping
//! - [`projector`]: inverse pinhole back-projection into world space
//! - [`filter`]: optional depth validity stage

pub mod filter;
pub mod intrinsics;
pub mod projector;
pub mod sampler;

pub use filter::DepthFilter;
pub use intrinsics::{AdjustedIntrinsics, CameraIntrinsics};
pub use projector::unproject_to_world;
pub use sampler::{DepthMap, GridSampler};
