// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines for captured point clouds
//!
//! Everything here runs off the frame path. Heavy work goes to tokio blocking
//! workers so frame delivery never waits on file I/O or meshing.
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────────┐     ┌──────────────┐
//! │   Snapshot   │ ──▶ │ ReconstructionGateway │ ──▶ │   OBJ File   │
//! │ (Vec<Vec3>)  │     │  - busy guard         │     │              │
//! │              │     │  - Reconstructor      │     │              │
//! └──────────────┘     └───────────────────────┘     └──────────────┘
//!
//! ┌──────────────┐     ┌───────────────────────┐     ┌──────────────┐
//! │   Snapshot   │ ──▶ │      LAS export       │ ──▶ │   LAS File   │
//! └──────────────┘     └───────────────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`scene`]: Mesh reconstruction and point cloud export

pub mod scene;
