// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use depthmesh::constants::{SENTINEL_POSITION, file_formats, grid, is_sentinel, reference_sensor};
use glam::Vec3;

#[test]
fn test_grid_size() {
    assert_eq!(grid::HORIZONTAL_POINTS * grid::VERTICAL_POINTS, 12288);
}

#[test]
fn test_sentinel_is_off_screen() {
    // Far behind the near plane of any camera at the origin
    assert_eq!(SENTINEL_POSITION, Vec3::new(0.0, 0.0, -1000.0));
    assert!(is_sentinel(SENTINEL_POSITION));
    assert!(!is_sentinel(Vec3::new(0.0, 0.0, -1.0)));
}

#[test]
fn test_reference_sensor_aspect() {
    // Depth plane and capture image share the 4:3 aspect ratio
    let image_aspect = reference_sensor::IMAGE_WIDTH as f32 / reference_sensor::IMAGE_HEIGHT as f32;
    let depth_aspect = reference_sensor::DEPTH_WIDTH as f32 / reference_sensor::DEPTH_HEIGHT as f32;
    assert!((image_aspect - depth_aspect).abs() < 1e-6);
}

#[test]
fn test_depth_file_extensions() {
    assert!(file_formats::is_depth_image_extension("png"));
    assert!(file_formats::is_depth_image_extension("TIFF"));
    assert!(file_formats::is_raw_depth_extension("f32"));
    assert!(!file_formats::is_raw_depth_extension("png"));
    assert!(!file_formats::is_depth_image_extension("jpg"));
}
