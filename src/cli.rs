// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Meshing the synthetic sensor scene
//! - Meshing and exporting recorded depth frames
//! - Inspecting configuration and previous output

use depthmesh::backends::sensor::{
    DepthSource, FileDepthSource, FrameLoopController, LoopAction, SyntheticDepthSource,
};
use depthmesh::constants::{output, reference_sensor, timing};
use depthmesh::pipelines::scene::export_point_cloud_las;
use depthmesh::{Config, FrameOutcome, MeshingSession, storage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Run the synthetic sensor for `frames` frames, then mesh the point cloud
pub fn run_synthetic(
    frames: u64,
    drop_every: Option<u64>,
    with_points: bool,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let mesh_path = resolve_output_path(output, &config, &config.mesh_file_name)?;
    let session = Arc::new(MeshingSession::with_grid_mesher(&config, mesh_path.clone()));

    let mut source =
        SyntheticDepthSource::new(reference_sensor::DEPTH_WIDTH, reference_sensor::DEPTH_HEIGHT)?
            .with_frame_limit(frames);
    if let Some(n) = drop_every {
        source = source.with_drop_every(n);
    }

    println!("Running synthetic sensor for {} frames...", frames);
    let skipped = Arc::new(AtomicU64::new(0));
    let mut controller = {
        let session = Arc::clone(&session);
        let skipped = Arc::clone(&skipped);
        FrameLoopController::start(source, timing::SENSOR_FRAME_INTERVAL, move |frame| {
            if let FrameOutcome::Skipped(_) = session.on_frame(&frame) {
                skipped.fetch_add(1, Ordering::Relaxed);
            }
            LoopAction::Continue
        })
    };
    let delivered = controller.join();
    println!(
        "Frames delivered: {} (without depth: {})",
        delivered,
        skipped.load(Ordering::Relaxed)
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let state = session.toggle().await?;
        println!("View: {:?}", state);
        if let Some(path) = session.mesh_path() {
            println!("Mesh saved: {}", path.display());
        }

        if with_points {
            let las_path = sibling_path(&mesh_path, output::POINT_CLOUD_FILE_NAME);
            let written = export_point_cloud_las(session.snapshot(), las_path.clone()).await?;
            println!("Point cloud saved: {} ({} points)", las_path.display(), written);
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Mesh a single recorded depth frame
pub fn mesh_recording(
    depth: PathBuf,
    camera: PathBuf,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let mut source = FileDepthSource::open(&depth, &camera)?;
    let mesh_path = resolve_output_path(output, &config, &config.mesh_file_name)?;
    let session = MeshingSession::with_grid_mesher(&config, mesh_path);

    feed_all(&mut source, &session)?;

    let rt = tokio::runtime::Runtime::new()?;
    let path = rt.block_on(session.request_mesh())?;
    println!("Mesh saved: {}", path.display());
    Ok(())
}

/// Export the projected point cloud of a recorded depth frame as LAS
pub fn export_points(
    depth: PathBuf,
    camera: PathBuf,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let mut source = FileDepthSource::open(&depth, &camera)?;
    let las_path = resolve_output_path(output, &config, output::POINT_CLOUD_FILE_NAME)?;
    let session = MeshingSession::with_grid_mesher(&config, las_path.with_extension("obj"));

    feed_all(&mut source, &session)?;

    let rt = tokio::runtime::Runtime::new()?;
    let written = rt.block_on(export_point_cloud_las(session.snapshot(), las_path.clone()))?;
    println!("Point cloud saved: {} ({} points)", las_path.display(), written);
    Ok(())
}

/// Print the effective configuration, or reset it to defaults
pub fn show_config(reset: bool) -> Result<(), Box<dyn std::error::Error>> {
    if reset {
        let path = Config::default().save()?;
        println!("Config reset: {}", path.display());
        return Ok(());
    }

    match Config::path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (no config directory)"),
    }
    println!("{}", serde_json::to_string_pretty(&Config::load())?);
    Ok(())
}

/// Print the newest mesh under `dir` or the configured output directory
pub fn print_latest(dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = dir.unwrap_or_else(|| output_base_dir(&Config::load()));
    let rt = tokio::runtime::Runtime::new()?;
    match rt.block_on(storage::latest_mesh(dir.clone())) {
        Some(path) => println!("{}", path.display()),
        None => println!("No meshes found in {}", dir.display()),
    }
    Ok(())
}

fn feed_all(
    source: &mut dyn DepthSource,
    session: &MeshingSession,
) -> Result<(), Box<dyn std::error::Error>> {
    while let Some(frame) = source.next_frame() {
        if let FrameOutcome::Skipped(reason) = session.on_frame(&frame) {
            return Err(format!("{}: {}", source.name(), reason).into());
        }
    }
    Ok(())
}

fn output_base_dir(config: &Config) -> PathBuf {
    config
        .output_dir
        .clone()
        .unwrap_or_else(storage::default_output_dir)
}

/// Explicit file, file inside an explicit directory, or a fresh scene directory
fn resolve_output_path(
    output: Option<PathBuf>,
    config: &Config,
    file_name: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match output {
        Some(path) if path.is_dir() => Ok(path.join(file_name)),
        Some(path) => Ok(path),
        None => {
            let scene_dir = storage::create_scene_dir(&output_base_dir(config))?;
            Ok(scene_dir.join(file_name))
        }
    }
}

fn sibling_path(path: &Path, file_name: &str) -> PathBuf {
    path.parent()
        .map(|p| p.join(file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}
