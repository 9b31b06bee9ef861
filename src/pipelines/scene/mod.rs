// SPDX-License-Identifier: GPL-3.0-only

//! Scene reconstruction pipeline
//!
//! Turns a point cloud snapshot into files:
//! - Triangle mesh through a pluggable [`Reconstructor`] (OBJ for the built-in one)
//! - Point cloud (LAS format)
//!
//! The [`ReconstructionGateway`] is the only way the rest of the crate reaches
//! a reconstructor; it owns the empty-input check and the busy guard.

mod gateway;
mod laz_export;
mod mesher;
mod obj_export;
mod outliers;

pub use gateway::{ReconstructionGateway, ReconstructionResult};
pub use laz_export::{export_point_cloud_las, write_point_cloud_las};
pub use mesher::{GridMesher, TriangleMesh};
pub use obj_export::write_obj;
pub use outliers::statistical_outlier_mask;

use glam::Vec3;
use std::path::{Path, PathBuf};

/// Surface reconstruction routine
///
/// Receives the full point list and a destination path, and either writes a
/// mesh there and returns the path of the written file, or reports why it
/// could not. Implementations may be slow; they are always invoked off the
/// frame path and never concurrently through the gateway.
pub trait Reconstructor: Send + Sync {
    fn reconstruct(&self, points: &[Vec3], output_path: &Path) -> Result<PathBuf, String>;

    /// Name used in logs
    fn name(&self) -> &str {
        "external"
    }
}

impl<F> Reconstructor for F
where
    F: Fn(&[Vec3], &Path) -> Result<PathBuf, String> + Send + Sync,
{
    fn reconstruct(&self, points: &[Vec3], output_path: &Path) -> Result<PathBuf, String> {
        self(points, output_path)
    }
}
