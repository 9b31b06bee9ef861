// SPDX-License-Identifier: GPL-3.0-only

//! Meshing session
//!
//! Wires the point cloud processor, the reconstruction gateway and the view
//! state machine together. Frames come in through [`MeshingSession::on_frame`]
//! from the frame loop thread; user actions come in through
//! [`MeshingSession::toggle`] and friends from an async context.

pub mod view_state;

pub use view_state::{ViewState, ViewStateMachine};

use crate::backends::sensor::SensorFrame;
use crate::config::Config;
use crate::errors::ReconstructionError;
use crate::pipelines::scene::{GridMesher, ReconstructionGateway, ReconstructionResult, Reconstructor};
use crate::point_cloud::{FrameOutcome, PointCloudBuffer, PointCloudProcessor, SharedPointCloud};
use glam::Vec3;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, TryLockError};
use tokio::sync::watch;
use tracing::{debug, info};

pub struct MeshingSession {
    processor: Mutex<PointCloudProcessor>,
    cloud: SharedPointCloud,
    gateway: ReconstructionGateway,
    view: ViewStateMachine,
}

impl MeshingSession {
    /// Session meshing through `reconstructor`, writing to `output_path`
    pub fn new(config: &Config, reconstructor: Arc<dyn Reconstructor>, output_path: PathBuf) -> Self {
        let cloud = SharedPointCloud::new(PointCloudBuffer::new(
            config.grid.horizontal_points,
            config.grid.vertical_points,
        ));
        let processor = PointCloudProcessor::new(cloud.clone(), config.depth_filter);

        info!(
            grid = format!(
                "{}x{}",
                config.grid.horizontal_points, config.grid.vertical_points
            ),
            reconstructor = reconstructor.name(),
            output = %output_path.display(),
            "Meshing session created"
        );

        Self {
            processor: Mutex::new(processor),
            cloud,
            gateway: ReconstructionGateway::new(reconstructor, output_path),
            view: ViewStateMachine::new(),
        }
    }

    /// Session using the built-in grid mesher
    pub fn with_grid_mesher(config: &Config, output_path: PathBuf) -> Self {
        let mesher = GridMesher::new(config.grid.horizontal_points, config.mesher);
        Self::new(config, Arc::new(mesher), output_path)
    }

    /// Update the point cloud from one sensor frame
    ///
    /// Never blocks on another frame: if one is still being processed this
    /// frame is dropped.
    pub fn on_frame(&self, frame: &SensorFrame) -> FrameOutcome {
        match self.processor.try_lock() {
            Ok(mut processor) => processor.on_frame(frame),
            Err(TryLockError::WouldBlock) => {
                debug!("Frame arrived while another is in flight, dropping");
                FrameOutcome::Dropped
            }
            Err(TryLockError::Poisoned(e)) => e.into_inner().on_frame(frame),
        }
    }

    /// Switch between the point cloud and a freshly reconstructed mesh
    pub async fn toggle(&self) -> Result<ViewState, ReconstructionError> {
        match self.view.current() {
            ViewState::PointCloud => self.request_mesh().await.map(|_| ViewState::Mesh),
            ViewState::Mesh => Ok(self.request_point_cloud()),
        }
    }

    /// Reconstruct the current snapshot and show it on success
    pub async fn request_mesh(&self) -> ReconstructionResult {
        let snapshot = self.cloud.snapshot();
        let result = self.gateway.reconstruct_async(snapshot).await;
        self.view.apply(&result);
        result
    }

    /// Go back to the live point cloud without recomputing anything
    pub fn request_point_cloud(&self) -> ViewState {
        self.view.show_point_cloud()
    }

    /// Copy of the current point cloud
    pub fn snapshot(&self) -> Vec<Vec3> {
        self.cloud.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.subscribe()
    }

    pub fn view_state(&self) -> ViewState {
        self.view.current()
    }

    /// Mesh currently shown, if any
    pub fn mesh_path(&self) -> Option<PathBuf> {
        self.view.mesh_path()
    }

    pub fn output_path(&self) -> &Path {
        self.gateway.output_path()
    }

    /// Shared buffer, for renderers that read points directly
    pub fn cloud(&self) -> &SharedPointCloud {
        &self.cloud
    }

    pub fn frames_processed(&self) -> u64 {
        self.processor
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .frames_processed()
    }
}
