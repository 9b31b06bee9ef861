// SPDX-License-Identifier: GPL-3.0-only

//! Output locations for meshes and point clouds

use crate::constants::output;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `~/Documents/depthmesh`, falling back to the working directory
pub fn default_output_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join(output::APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(output::APP_DIR_NAME))
}

/// Fresh timestamped scene directory under `base`, e.g. `scene_20261015_142233`
///
/// The directory is created. A numeric suffix is added when two scenes are
/// created within the same second.
pub fn create_scene_dir(base: &Path) -> std::io::Result<PathBuf> {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let mut dir = base.join(format!("{}{}", output::SCENE_DIR_PREFIX, stamp));
    let mut suffix = 1;
    while dir.exists() {
        dir = base.join(format!("{}{}_{}", output::SCENE_DIR_PREFIX, stamp, suffix));
        suffix += 1;
    }

    std::fs::create_dir_all(&dir)?;
    debug!(path = %dir.display(), "Created scene directory");
    Ok(dir)
}

/// Most recently modified `.obj` file under `base`, searching one level of scene directories
pub async fn latest_mesh(base: PathBuf) -> Option<PathBuf> {
    tokio::task::spawn_blocking(move || latest_mesh_blocking(&base))
        .await
        .ok()
        .flatten()
}

fn latest_mesh_blocking(base: &Path) -> Option<PathBuf> {
    let mut meshes = Vec::new();
    collect_meshes(base, &mut meshes);
    if let Ok(entries) = std::fs::read_dir(base) {
        for entry in entries.flatten() {
            if entry.path().is_dir() {
                collect_meshes(&entry.path(), &mut meshes);
            }
        }
    }

    // Sort by modification time (newest first)
    meshes.sort_by_key(|(_, modified)| std::cmp::Reverse(*modified));

    let latest = meshes.into_iter().next().map(|(path, _)| path);
    debug!(path = ?latest, "Latest mesh");
    latest
}

fn collect_meshes(dir: &Path, out: &mut Vec<(PathBuf, Option<std::time::SystemTime>)>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let is_obj = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
        if is_obj {
            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
            out.push((path, modified));
        }
    }
}
