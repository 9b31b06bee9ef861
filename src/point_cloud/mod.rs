// SPDX-License-Identifier: GPL-3.0-only

//! Grid-ordered world-space point cloud
//!
//! [`PointCloudBuffer`] holds one point per grid cell and is overwritten in
//! place by [`PointCloudProcessor`] every frame. Readers (renderers, the
//! reconstruction gateway) take copies through [`SharedPointCloud`].

mod buffer;
mod processor;

pub use buffer::{PointCloudBuffer, SharedPointCloud};
pub use processor::{FrameOutcome, PointCloudProcessor};
