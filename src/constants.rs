// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use glam::Vec3;
use std::time::Duration;

/// Sampling grid laid over every depth map
pub mod grid {
    /// Grid columns
    pub const HORIZONTAL_POINTS: usize = 128;
    /// Grid rows
    pub const VERTICAL_POINTS: usize = 96;
}

/// Position held by buffer slots that have never been projected (or were filtered)
///
/// Far behind the origin so a renderer drawing the raw buffer never shows it.
pub const SENTINEL_POSITION: Vec3 = Vec3::new(0.0, 0.0, -1000.0);

/// Check whether a buffer slot holds the off-screen sentinel
pub fn is_sentinel(point: Vec3) -> bool {
    point == SENTINEL_POSITION
}

/// Output artifact names
pub mod output {
    /// Default mesh file name inside the output directory
    pub const MESH_FILE_NAME: &str = "mesh.obj";
    /// Point cloud export file name
    pub const POINT_CLOUD_FILE_NAME: &str = "pointcloud.las";
    /// Directory under the user's documents folder
    pub const APP_DIR_NAME: &str = "depthmesh";
    /// Prefix of timestamped scene directories
    pub const SCENE_DIR_PREFIX: &str = "scene_";
}

/// Defaults for the built-in grid mesher
pub mod mesher {
    /// Neighbours considered by statistical outlier removal
    pub const OUTLIER_MEAN_K: usize = 20;
    /// Standard deviation multiplier for the outlier threshold
    pub const OUTLIER_STDDEV_MULT: f32 = 1.0;
    /// Longest edge (meters) a grid triangle may have; longer means a depth discontinuity
    pub const MAX_EDGE_LENGTH: f32 = 0.2;
    /// Neighbours used for the per-vertex density estimate
    pub const DENSITY_NEIGHBORS: usize = 10;
    /// Fraction of lowest-density vertices whose faces get trimmed
    pub const DENSITY_QUANTILE: f32 = 0.10;
}

/// Reference sensor used by the synthetic source
///
/// Calibrated against a 1920x1440 capture image with a 256x192 depth map.
pub mod reference_sensor {
    /// Focal length X (pixels) at image resolution
    pub const FX: f32 = 1450.0;
    /// Focal length Y (pixels) at image resolution
    pub const FY: f32 = 1450.0;
    /// Principal point X (pixels) at image resolution
    pub const CX: f32 = 960.0;
    /// Principal point Y (pixels) at image resolution
    pub const CY: f32 = 720.0;
    /// Capture image width
    pub const IMAGE_WIDTH: u32 = 1920;
    /// Capture image height
    pub const IMAGE_HEIGHT: u32 = 1440;
    /// Depth map width
    pub const DEPTH_WIDTH: u32 = 256;
    /// Depth map height
    pub const DEPTH_HEIGHT: u32 = 192;
}

/// Frame delivery timing
pub mod timing {
    use super::Duration;

    /// Interval between synthetic sensor ticks (~60 Hz)
    pub const SENSOR_FRAME_INTERVAL: Duration = Duration::from_millis(16);
}

/// Supported depth file formats
pub mod file_formats {
    /// 16-bit depth images in millimeters
    pub const DEPTH_IMAGE_EXTENSIONS: &[&str] = &["png", "tif", "tiff"];
    /// Raw little-endian f32 depth in meters
    pub const RAW_DEPTH_EXTENSIONS: &[&str] = &["f32", "raw", "bin"];

    /// Check if an extension is a depth image
    pub fn is_depth_image_extension(ext: &str) -> bool {
        DEPTH_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }

    /// Check if an extension is a raw float depth dump
    pub fn is_raw_depth_extension(ext: &str) -> bool {
        RAW_DEPTH_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}
