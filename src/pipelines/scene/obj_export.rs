// SPDX-License-Identifier: GPL-3.0-only

//! Wavefront OBJ mesh export

use super::TriangleMesh;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Write `mesh` as an ASCII OBJ file, creating parent directories as needed
pub fn write_obj(mesh: &TriangleMesh, output_path: &Path) -> Result<(), String> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }

    let file = File::create(output_path)
        .map_err(|e| format!("Failed to create {}: {}", output_path.display(), e))?;
    let mut writer = BufWriter::new(file);

    write_records(mesh, &mut writer).map_err(|e| format!("Failed to write OBJ: {}", e))?;
    writer
        .flush()
        .map_err(|e| format!("Failed to flush OBJ: {}", e))?;

    debug!(path = %output_path.display(), "OBJ export complete");
    Ok(())
}

fn write_records(mesh: &TriangleMesh, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "# {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))?;
    writeln!(
        out,
        "# vertices {} faces {}",
        mesh.vertices.len(),
        mesh.faces.len()
    )?;

    for v in &mesh.vertices {
        writeln!(out, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    // OBJ indices are 1-based
    for [a, b, c] in &mesh.faces {
        writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_records_are_one_based() {
        let mesh = TriangleMesh {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            faces: vec![[0, 1, 2]],
        };
        let mut out = Vec::new();
        write_records(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert!(text.lines().any(|l| l == "f 1 2 3"));
        assert!(text.contains("v 1.000000 0.000000 0.000000"));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/scene/mesh.obj");
        let mesh = TriangleMesh {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            faces: vec![[0, 1, 2]],
        };

        write_obj(&mesh, &path).unwrap();
        assert!(path.exists());
    }
}
