// SPDX-License-Identifier: GPL-3.0-only

//! Depth sensor sources
//!
//! A [`DepthSource`] yields [`SensorFrame`]s: an optional metric depth map
//! plus the intrinsics and pose of the camera that captured it. Sources:
//!
//! - [`SyntheticDepthSource`]: ray-cast test scene with an orbiting camera
//! - [`FileDepthSource`]: a single recorded depth frame with a JSON sidecar
//!
//! [`FrameLoopController`] drives a source on its own thread at sensor rate.

mod file_source;
mod frame_loop;
mod synthetic;
mod types;

pub use file_source::{FileDepthSource, load_camera_metadata, load_depth_map};
pub use frame_loop::{FrameLoopController, LoopAction};
pub use synthetic::SyntheticDepthSource;
pub use types::{CameraMetadata, SensorFrame};

/// Something that produces depth frames
pub trait DepthSource: Send {
    /// Next frame, or None once the source is exhausted
    ///
    /// A frame with `depth: None` is a tick on which the sensor delivered
    /// no depth and is not the end of the stream.
    fn next_frame(&mut self) -> Option<SensorFrame>;

    /// Name used in logs
    fn name(&self) -> &str;
}
