// SPDX-License-Identifier: GPL-3.0-only

//! Recorded depth frames
//!
//! A recording is a depth file plus a JSON [`CameraMetadata`] sidecar.
//! Depth files are either 16-bit grayscale images holding millimeters
//! (PNG/TIFF) or raw little-endian `f32` meters whose resolution comes from
//! the sidecar.

use super::{CameraMetadata, DepthSource, SensorFrame};
use crate::constants::file_formats;
use crate::depth::{CameraIntrinsics, DepthMap};
use crate::errors::{AppError, AppResult};
use std::path::Path;
use tracing::{debug, info};

/// Read a camera sidecar
pub fn load_camera_metadata(path: &Path) -> AppResult<CameraMetadata> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| AppError::Source(format!("Failed to read {}: {}", path.display(), e)))?;
    let metadata: CameraMetadata = serde_json::from_str(&contents)
        .map_err(|e| AppError::Source(format!("Invalid camera file {}: {}", path.display(), e)))?;

    debug!(
        path = %path.display(),
        resolution = format!("{}x{}", metadata.image_width, metadata.image_height),
        "Loaded camera metadata"
    );
    Ok(metadata)
}

/// Read a depth file in meters
pub fn load_depth_map(path: &Path, metadata: &CameraMetadata) -> AppResult<DepthMap> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if file_formats::is_depth_image_extension(&extension) {
        load_depth_image(path)
    } else if file_formats::is_raw_depth_extension(&extension) {
        load_raw_depth(path, metadata)
    } else {
        Err(AppError::Source(format!(
            "Unsupported depth format: {}",
            extension
        )))
    }
}

fn load_depth_image(path: &Path) -> AppResult<DepthMap> {
    let image = image::open(path)
        .map_err(|e| AppError::Source(format!("Failed to open {}: {}", path.display(), e)))?
        .into_luma16();
    let (width, height) = image.dimensions();

    // 0 means no reading and stays 0
    let data: Vec<f32> = image.into_raw().into_iter().map(|mm| mm as f32 / 1000.0).collect();

    DepthMap::new(width, height, data).map_err(AppError::from)
}

fn load_raw_depth(path: &Path, metadata: &CameraMetadata) -> AppResult<DepthMap> {
    let (Some(width), Some(height)) = (metadata.depth_width, metadata.depth_height) else {
        return Err(AppError::Source(
            "Raw depth needs depth_width and depth_height in the camera file".to_string(),
        ));
    };

    let bytes = std::fs::read(path)
        .map_err(|e| AppError::Source(format!("Failed to read {}: {}", path.display(), e)))?;
    if bytes.len() % std::mem::size_of::<f32>() != 0 {
        return Err(AppError::Source(format!(
            "{} is not a whole number of f32 values ({} bytes)",
            path.display(),
            bytes.len()
        )));
    }

    let words: Vec<u32> = bytemuck::pod_collect_to_vec(&bytes);
    let data: Vec<f32> = words
        .into_iter()
        .map(|w| f32::from_bits(u32::from_le(w)))
        .collect();
    DepthMap::new(width, height, data).map_err(AppError::from)
}

/// Yields one recorded frame, then ends
pub struct FileDepthSource {
    frame: Option<SensorFrame>,
    name: String,
}

impl FileDepthSource {
    pub fn open(depth_path: &Path, camera_path: &Path) -> AppResult<Self> {
        let metadata = load_camera_metadata(camera_path)?;
        let depth = load_depth_map(depth_path, &metadata)?;

        info!(
            path = %depth_path.display(),
            depth_resolution = format!("{}x{}", depth.width(), depth.height()),
            "Loaded depth frame"
        );

        let frame = SensorFrame::new(
            Some(depth),
            CameraIntrinsics::from_matrix(&metadata.intrinsics),
            metadata.image_width,
            metadata.image_height,
            metadata.inverse_view,
        );

        Ok(Self {
            frame: Some(frame),
            name: depth_path.display().to_string(),
        })
    }
}

impl DepthSource for FileDepthSource {
    fn next_frame(&mut self) -> Option<SensorFrame> {
        self.frame.take()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat3, Mat4};
    use std::path::PathBuf;

    fn metadata(depth: Option<(u32, u32)>) -> CameraMetadata {
        CameraMetadata {
            image_width: 64,
            image_height: 48,
            intrinsics: CameraIntrinsics::new(60.0, 60.0, 32.0, 24.0).to_matrix(),
            inverse_view: Mat4::IDENTITY,
            depth_width: depth.map(|d| d.0),
            depth_height: depth.map(|d| d.1),
        }
    }

    fn write_sidecar(dir: &Path, metadata: &CameraMetadata) -> PathBuf {
        let path = dir.join("camera.json");
        std::fs::write(&path, serde_json::to_string(metadata).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_png_millimeters_to_meters() {
        let dir = tempfile::tempdir().unwrap();
        let depth_path = dir.path().join("depth.png");
        let mut image = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::new(16, 12);
        image.put_pixel(3, 2, image::Luma([1500]));
        image.save(&depth_path).unwrap();

        let depth = load_depth_map(&depth_path, &metadata(None)).unwrap();
        assert_eq!((depth.width(), depth.height()), (16, 12));
        assert!((depth.sample(3, 2) - 1.5).abs() < 1e-6);
        assert_eq!(depth.sample(0, 0), 0.0);
    }

    #[test]
    fn test_raw_f32_uses_sidecar_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let depth_path = dir.path().join("depth.f32");
        let values = vec![2.5f32; 8 * 6];
        std::fs::write(&depth_path, bytemuck::cast_slice::<f32, u8>(&values)).unwrap();

        let depth = load_depth_map(&depth_path, &metadata(Some((8, 6)))).unwrap();
        assert_eq!(depth.sample(7, 5), 2.5);

        // Resolution that disagrees with the file length
        assert!(load_depth_map(&depth_path, &metadata(Some((8, 5)))).is_err());
        // No resolution at all
        assert!(load_depth_map(&depth_path, &metadata(None)).is_err());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = load_depth_map(Path::new("depth.jpg"), &metadata(None));
        assert!(matches!(result, Err(AppError::Source(_))));
    }

    #[test]
    fn test_source_yields_once() {
        let dir = tempfile::tempdir().unwrap();
        let meta = metadata(Some((4, 3)));
        let camera_path = write_sidecar(dir.path(), &meta);
        let depth_path = dir.path().join("depth.raw");
        std::fs::write(&depth_path, bytemuck::cast_slice::<f32, u8>(&[1.0f32; 12])).unwrap();

        let mut source = FileDepthSource::open(&depth_path, &camera_path).unwrap();
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.intrinsics, Mat3::from_cols_array(&[60.0, 0.0, 0.0, 0.0, 60.0, 0.0, 32.0, 24.0, 1.0]));
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_sidecar_pose_defaults_to_identity() {
        let json = r#"{
            "image_width": 1920,
            "image_height": 1440,
            "intrinsics": [1450.0, 0.0, 0.0, 0.0, 1450.0, 0.0, 960.0, 720.0, 1.0]
        }"#;
        let metadata: CameraMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.inverse_view, Mat4::IDENTITY);
        assert_eq!(metadata.depth_width, None);
    }
}
