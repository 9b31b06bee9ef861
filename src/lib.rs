// SPDX-License-Identifier: GPL-3.0-only

//! depthmesh - depth maps to world-space point clouds and meshes
//!
//! Each depth frame is subsampled on a fixed grid, every sample is projected
//! into world space with the frame's intrinsics and camera pose, and the
//! result overwrites a fixed-size point buffer. On request the buffer is
//! handed to a surface reconstruction routine that writes a mesh file.
//!
//! # Architecture
//!
//! - [`depth`]: Intrinsics rescaling, grid sampling, world projection
//! - [`point_cloud`]: The grid-indexed point buffer and per-frame update pass
//! - [`pipelines`]: Reconstruction gateway, built-in mesher, exporters
//! - [`app`]: Meshing session and the point cloud / mesh view state
//! - [`backends`]: Depth sources and the frame loop
//! - [`config`]: User configuration handling
//! - [`storage`]: Output directories
//!
//! # Example
//!
//! ```ignore
//! let config = Config::load();
//! let session = MeshingSession::with_grid_mesher(&config, "mesh.obj".into());
//! session.on_frame(&frame);
//! let state = session.toggle().await?;
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod depth;
pub mod errors;
pub mod pipelines;
pub mod point_cloud;
pub mod storage;

// Re-export commonly used types
pub use app::{MeshingSession, ViewState};
pub use config::Config;
pub use errors::{AppError, AppResult, PointCloudError, ReconstructionError};
pub use pipelines::scene::{ReconstructionGateway, ReconstructionResult, Reconstructor};
pub use point_cloud::{FrameOutcome, PointCloudBuffer};
