// SPDX-License-Identifier: GPL-3.0-only

//! Built-in reconstructor for grid-ordered point clouds
//!
//! Steps:
//! 1. Mask out sentinel and non-finite points
//! 2. Statistical outlier removal
//! 3. Triangulate neighbouring grid cells, skipping long edges
//! 4. Trim faces touching low-density vertices
//! 5. Write OBJ

use super::Reconstructor;
use super::obj_export::write_obj;
use super::outliers::{local_densities, statistical_outlier_mask};
use crate::config::MesherConfig;
use crate::constants::is_sentinel;
use glam::Vec3;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Indexed triangle mesh, counter-clockwise front faces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Meshes a row-major grid of points using the grid adjacency
pub struct GridMesher {
    horizontal_points: usize,
    config: MesherConfig,
}

impl GridMesher {
    pub fn new(horizontal_points: usize, config: MesherConfig) -> Self {
        Self {
            horizontal_points,
            config,
        }
    }

    /// Build the mesh without writing it
    pub fn build_mesh(&self, points: &[Vec3]) -> Result<TriangleMesh, String> {
        let cols = self.horizontal_points;
        if cols == 0 || points.len() % cols != 0 {
            return Err(format!(
                "{} points do not form rows of {}",
                points.len(),
                cols
            ));
        }

        let valid: Vec<bool> = points
            .iter()
            .map(|p| p.is_finite() && !is_sentinel(*p))
            .collect();
        let valid_count = valid.iter().filter(|&&v| v).count();
        if valid_count < 3 {
            return Err(format!("Only {} valid points, cannot mesh", valid_count));
        }

        let kept = statistical_outlier_mask(
            points,
            &valid,
            self.config.outlier_mean_k,
            self.config.outlier_stddev_mult,
        );
        debug!(
            valid = valid_count,
            kept = kept.iter().filter(|&&k| k).count(),
            "Outlier removal done"
        );

        let mesh = self.triangulate(points, &kept, cols);
        let mesh = self.trim_low_density(mesh);

        if mesh.is_empty() {
            return Err("Mesh generation produced no faces".to_string());
        }
        Ok(mesh)
    }

    fn triangulate(&self, points: &[Vec3], kept: &[bool], cols: usize) -> TriangleMesh {
        let rows = points.len() / cols;
        let max_edge_sq = self.config.max_edge_length * self.config.max_edge_length;
        let mut mesh = TriangleMesh::default();
        let mut vertex_map: Vec<Option<u32>> = vec![None; points.len()];

        let mut vertex_for = |idx: usize, mesh: &mut TriangleMesh| -> u32 {
            *vertex_map[idx].get_or_insert_with(|| {
                mesh.vertices.push(points[idx]);
                (mesh.vertices.len() - 1) as u32
            })
        };

        for v in 1..rows {
            for h in 1..cols {
                let idx00 = (v - 1) * cols + (h - 1);
                let idx10 = (v - 1) * cols + h;
                let idx01 = v * cols + (h - 1);
                let idx11 = v * cols + h;

                if !(kept[idx00] && kept[idx10] && kept[idx01] && kept[idx11]) {
                    continue;
                }

                let (p00, p10, p01, p11) = (points[idx00], points[idx10], points[idx01], points[idx11]);
                let longest = p00
                    .distance_squared(p10)
                    .max(p00.distance_squared(p01))
                    .max(p11.distance_squared(p10))
                    .max(p11.distance_squared(p01))
                    .max(p10.distance_squared(p01));
                if longest > max_edge_sq {
                    continue;
                }

                let i00 = vertex_for(idx00, &mut mesh);
                let i10 = vertex_for(idx10, &mut mesh);
                let i01 = vertex_for(idx01, &mut mesh);
                let i11 = vertex_for(idx11, &mut mesh);

                // Rows run downward, so (00, 01, 10) faces the camera
                mesh.faces.push([i00, i01, i10]);
                mesh.faces.push([i10, i01, i11]);
            }
        }

        mesh
    }

    /// Drop faces that touch a vertex below the configured density quantile
    fn trim_low_density(&self, mesh: TriangleMesh) -> TriangleMesh {
        let k = self.config.density_neighbors;
        let quantile = self.config.density_quantile;
        if k == 0 || quantile <= 0.0 || mesh.vertices.len() <= k {
            return mesh;
        }

        let densities = local_densities(&mesh.vertices, k);
        let mut sorted = densities.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let cut = ((quantile * sorted.len() as f32) as usize).min(sorted.len() - 1);
        let threshold = sorted[cut];

        let face_count = mesh.faces.len();
        let faces: Vec<[u32; 3]> = mesh
            .faces
            .into_iter()
            .filter(|face| face.iter().all(|&i| densities[i as usize] >= threshold))
            .collect();

        debug!(
            threshold,
            removed_faces = face_count - faces.len(),
            "Density trim done"
        );

        compact(mesh.vertices, faces)
    }
}

/// Remove vertices no face references and renumber faces
fn compact(vertices: Vec<Vec3>, faces: Vec<[u32; 3]>) -> TriangleMesh {
    let mut remap: Vec<Option<u32>> = vec![None; vertices.len()];
    let mut mesh = TriangleMesh::default();

    for face in &faces {
        let mut out = [0u32; 3];
        for (slot, &i) in out.iter_mut().zip(face) {
            *slot = *remap[i as usize].get_or_insert_with(|| {
                mesh.vertices.push(vertices[i as usize]);
                (mesh.vertices.len() - 1) as u32
            });
        }
        mesh.faces.push(out);
    }

    mesh
}

impl Reconstructor for GridMesher {
    fn reconstruct(&self, points: &[Vec3], output_path: &Path) -> Result<PathBuf, String> {
        let mesh = self.build_mesh(points)?;
        write_obj(&mesh, output_path)?;
        info!(
            vertices = mesh.vertices.len(),
            faces = mesh.faces.len(),
            path = %output_path.display(),
            "Grid mesh written"
        );
        Ok(output_path.to_path_buf())
    }

    fn name(&self) -> &str {
        "grid"
    }
}
