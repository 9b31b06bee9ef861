// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for depth input
//!
//! ```text
//! ┌──────────────────────────────┐
//! │        MeshingSession        │
//! └──────────────┬───────────────┘
//!                │ SensorFrame
//! ┌──────────────┴───────────────┐
//! │  FrameLoopController thread  │
//! │  ┌───────────┐ ┌──────────┐  │
//! │  │ Synthetic │ │   File   │  │
//! │  └───────────┘ └──────────┘  │
//! └──────────────────────────────┘
//! ```

pub mod sensor;
