// SPDX-License-Identifier: GPL-3.0-only

//! What the viewer is showing: the live point cloud or a reconstructed mesh

use crate::pipelines::scene::ReconstructionResult;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    PointCloud,
    Mesh,
}

/// Two-state machine published on a watch channel
///
/// Only a successful reconstruction result moves it to [`ViewState::Mesh`];
/// going back to the point cloud is unconditional.
pub struct ViewStateMachine {
    state: watch::Sender<ViewState>,
    mesh_path: Mutex<Option<PathBuf>>,
}

impl ViewStateMachine {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ViewState::PointCloud);
        Self {
            state,
            mesh_path: Mutex::new(None),
        }
    }

    pub fn current(&self) -> ViewState {
        *self.state.borrow()
    }

    /// Receiver that observes every transition
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Mesh currently shown, if any
    pub fn mesh_path(&self) -> Option<PathBuf> {
        self.mesh_path
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Apply a reconstruction result; failures leave the state alone
    pub(crate) fn apply(&self, result: &ReconstructionResult) -> ViewState {
        if let Ok(path) = result {
            *self.mesh_path.lock().unwrap_or_else(|e| e.into_inner()) = Some(path.clone());
            self.transition(ViewState::Mesh);
        }
        self.current()
    }

    /// Return to the live point cloud
    pub fn show_point_cloud(&self) -> ViewState {
        self.mesh_path
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        self.transition(ViewState::PointCloud);
        ViewState::PointCloud
    }

    fn transition(&self, next: ViewState) {
        // send_if_modified works with no receivers, unlike send
        let changed = self.state.send_if_modified(|state| {
            if *state == next {
                return false;
            }
            *state = next;
            true
        });
        if changed {
            info!(state = ?next, "View state changed");
        }
    }
}

impl Default for ViewStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
