// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{grid, mesher, output};
use crate::depth::DepthFilter;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Config file name inside the per-user config directory
const CONFIG_FILE_NAME: &str = "config.json";

/// Size of the sampling grid laid over each depth map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of columns
    pub horizontal_points: usize,
    /// Number of rows
    pub vertical_points: usize,
}

impl GridConfig {
    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.horizontal_points * self.vertical_points
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            horizontal_points: grid::HORIZONTAL_POINTS,
            vertical_points: grid::VERTICAL_POINTS,
        }
    }
}

/// Tuning for the built-in grid mesher
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MesherConfig {
    /// Neighbours for statistical outlier removal (0 disables it)
    pub outlier_mean_k: usize,
    /// Standard deviation multiplier for the outlier threshold
    pub outlier_stddev_mult: f32,
    /// Longest allowed triangle edge in meters
    pub max_edge_length: f32,
    /// Neighbours for the per-vertex density estimate
    pub density_neighbors: usize,
    /// Lowest-density fraction to trim (0 disables trimming)
    pub density_quantile: f32,
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            outlier_mean_k: mesher::OUTLIER_MEAN_K,
            outlier_stddev_mult: mesher::OUTLIER_STDDEV_MULT,
            max_edge_length: mesher::MAX_EDGE_LENGTH,
            density_neighbors: mesher::DENSITY_NEIGHBORS,
            density_quantile: mesher::DENSITY_QUANTILE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sampling grid
    pub grid: GridConfig,
    /// Where meshes and exports are written (None = documents/depthmesh)
    pub output_dir: Option<PathBuf>,
    /// File name of the reconstructed mesh
    pub mesh_file_name: String,
    /// Optional depth validity range applied before projection (None = pass-through)
    pub depth_filter: Option<DepthFilter>,
    /// Built-in mesher tuning
    pub mesher: MesherConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            output_dir: None,
            mesh_file_name: output::MESH_FILE_NAME.to_string(),
            depth_filter: None,
            mesher: MesherConfig::default(),
        }
    }
}

impl Config {
    /// Path of the config file (~/.config/depthmesh/config.json on Linux)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(output::APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the user config, falling back to defaults when absent or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(config) => {
                debug!(path = %path.display(), "Loaded config");
                config
            }
            Err(AppError::Storage(_)) => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
                Self::default()
            }
        }
    }

    /// Load a config from an explicit file
    pub fn load_from(path: &std::path::Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Write the config to the user config file
    pub fn save(&self) -> AppResult<PathBuf> {
        let path = Self::path()
            .ok_or_else(|| AppError::Config("No config directory available".to_string()))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write the config to an explicit file, creating parent directories
    pub fn save_to(&self, path: &std::path::Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
