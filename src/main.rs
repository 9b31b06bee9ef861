// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "depthmesh")]
#[command(about = "Project depth maps into point clouds and reconstruct meshes")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the synthetic sensor and mesh the resulting point cloud
    Synthetic {
        /// Number of sensor frames to process
        #[arg(short, long, default_value = "60")]
        frames: u64,

        /// Deliver no depth on every Nth frame
        #[arg(long)]
        drop_every: Option<u64>,

        /// Also export the point cloud as LAS next to the mesh
        #[arg(long)]
        with_points: bool,

        /// Output mesh path (default: ~/Documents/depthmesh/scene_TIMESTAMP/mesh.obj)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Mesh a recorded depth frame
    Mesh {
        /// Depth file (16-bit PNG/TIFF in millimeters, or raw f32 meters)
        #[arg(short, long)]
        depth: PathBuf,

        /// Camera JSON with intrinsics and pose
        #[arg(short, long)]
        camera: PathBuf,

        /// Output mesh path (default: ~/Documents/depthmesh/scene_TIMESTAMP/mesh.obj)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the point cloud of a recorded depth frame as LAS
    ExportPoints {
        /// Depth file (16-bit PNG/TIFF in millimeters, or raw f32 meters)
        #[arg(short, long)]
        depth: PathBuf,

        /// Camera JSON with intrinsics and pose
        #[arg(short, long)]
        camera: PathBuf,

        /// Output LAS path (default: ~/Documents/depthmesh/scene_TIMESTAMP/pointcloud.las)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the configuration
    Config {
        /// Overwrite the config file with defaults
        #[arg(long)]
        reset: bool,
    },

    /// Print the most recent mesh
    Latest {
        /// Directory to search (default: the configured output directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=depthmesh=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Synthetic {
            frames,
            drop_every,
            with_points,
            output,
        } => cli::run_synthetic(frames, drop_every, with_points, output),
        Commands::Mesh {
            depth,
            camera,
            output,
        } => cli::mesh_recording(depth, camera, output),
        Commands::ExportPoints {
            depth,
            camera,
            output,
        } => cli::export_points(depth, camera, output),
        Commands::Config { reset } => cli::show_config(reset),
        Commands::Latest { dir } => cli::print_latest(dir),
    }
}
