// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use depthmesh::Config;
use depthmesh::config::{GridConfig, MesherConfig};
use depthmesh::depth::DepthFilter;

#[test]
fn test_config_default() {
    let config = Config::default();

    // 128x96 grid, unfiltered, OBJ output
    assert_eq!(config.grid.horizontal_points, 128);
    assert_eq!(config.grid.vertical_points, 96);
    assert_eq!(config.grid.cell_count(), 12288);
    assert!(config.depth_filter.is_none(), "Depth filter should be off by default");
    assert_eq!(config.mesh_file_name, "mesh.obj");
    assert!(config.output_dir.is_none());
}

#[test]
fn test_mesher_defaults() {
    let mesher = MesherConfig::default();
    assert_eq!(mesher.outlier_mean_k, 20);
    assert_eq!(mesher.outlier_stddev_mult, 1.0);
    assert_eq!(mesher.density_neighbors, 10);
    assert!((mesher.density_quantile - 0.10).abs() < f32::EPSILON);
    assert!(mesher.max_edge_length > 0.0);
}

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        grid: GridConfig {
            horizontal_points: 64,
            vertical_points: 48,
        },
        depth_filter: Some(DepthFilter::new(0.2, 4.0)),
        ..Config::default()
    };
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "mesh_file_name": "scan.obj", "mesher": { "outlier_mean_k": 8 } }"#)
        .unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.mesh_file_name, "scan.obj");
    assert_eq!(loaded.mesher.outlier_mean_k, 8);
    assert_eq!(loaded.mesher.density_neighbors, 10);
    assert_eq!(loaded.grid, GridConfig::default());
}

#[test]
fn test_invalid_config_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        Config::load_from(&path),
        Err(depthmesh::AppError::Config(_))
    ));
}
