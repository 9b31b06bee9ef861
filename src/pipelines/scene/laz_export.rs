// SPDX-License-Identifier: GPL-3.0-only

//! LAS point cloud export
//!
//! Writes the world-space grid points as an uncompressed LAS 1.4 file.
//! Sentinel and non-finite points are left out.

use crate::constants::is_sentinel;
use glam::Vec3;
use las::{Builder, Point, Writer};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Export a point cloud snapshot on a blocking worker, returning the number of points written
pub async fn export_point_cloud_las(points: Vec<Vec3>, output_path: PathBuf) -> Result<usize, String> {
    tokio::task::spawn_blocking(move || write_point_cloud_las(&points, &output_path))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

/// Write the LAS file on the calling thread
pub fn write_point_cloud_las(points: &[Vec3], output_path: &Path) -> Result<usize, String> {
    let points: Vec<Vec3> = points
        .iter()
        .copied()
        .filter(|p| p.is_finite() && !is_sentinel(*p))
        .collect();

    if points.is_empty() {
        return Err("No valid points to export".to_string());
    }

    info!(
        point_count = points.len(),
        path = %output_path.display(),
        "Exporting point cloud"
    );

    let (min, max) = points
        .iter()
        .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(min, max), p| {
            (min.min(*p), max.max(*p))
        });
    let center = ((min + max) / 2.0).as_dvec3();

    let mut builder = Builder::from((1, 4)); // LAS 1.4
    builder.point_format.is_compressed = false;

    // 1mm precision around the cloud centre
    let scale = 0.001;
    builder.transforms = las::Vector {
        x: las::Transform {
            scale,
            offset: center.x,
        },
        y: las::Transform {
            scale,
            offset: center.y,
        },
        z: las::Transform {
            scale,
            offset: center.z,
        },
    };

    let header = builder
        .into_header()
        .map_err(|e| format!("Failed to build LAS header: {}", e))?;

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }

    let mut writer = Writer::from_path(output_path, header)
        .map_err(|e| format!("Failed to create LAS writer: {}", e))?;

    for p in &points {
        let point = Point {
            x: p.x as f64,
            y: p.y as f64,
            z: p.z as f64,
            ..Default::default()
        };
        writer
            .write_point(point)
            .map_err(|e| format!("Failed to write point: {}", e))?;
    }

    writer
        .close()
        .map_err(|e| format!("Failed to close LAS file: {}", e))?;

    debug!(path = %output_path.display(), "LAS export complete");
    Ok(points.len())
}
