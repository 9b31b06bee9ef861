// SPDX-License-Identifier: GPL-3.0-only

//! Fixed-capacity grid-indexed point storage

use crate::constants::SENTINEL_POSITION;
use crate::errors::PointCloudError;
use glam::Vec3;
use std::sync::{Arc, Mutex, MutexGuard};

/// Latest world-space point per grid cell
///
/// Length is `horizontal_points * vertical_points` for the whole lifetime of
/// the buffer. Frames overwrite slots in place; nothing ever grows or shrinks it.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloudBuffer {
    horizontal_points: usize,
    vertical_points: usize,
    points: Vec<Vec3>,
}

impl PointCloudBuffer {
    /// Create a buffer with every slot at the off-screen sentinel
    pub fn new(horizontal_points: usize, vertical_points: usize) -> Self {
        Self {
            horizontal_points,
            vertical_points,
            points: vec![SENTINEL_POSITION; horizontal_points * vertical_points],
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn horizontal_points(&self) -> usize {
        self.horizontal_points
    }

    pub fn vertical_points(&self) -> usize {
        self.vertical_points
    }

    /// Slot index of grid cell (h, v)
    pub fn index_of(&self, h: usize, v: usize) -> Result<usize, PointCloudError> {
        let index = v * self.horizontal_points + h;
        if h >= self.horizontal_points || index >= self.points.len() {
            return Err(PointCloudError::InvalidGridIndex {
                index,
                capacity: self.points.len(),
            });
        }
        Ok(index)
    }

    /// Point stored for grid cell (h, v)
    pub fn get(&self, h: usize, v: usize) -> Result<Vec3, PointCloudError> {
        let index = self.index_of(h, v)?;
        Ok(self.points[index])
    }

    /// Read-only view of all slots in grid order
    pub fn as_slice(&self) -> &[Vec3] {
        &self.points
    }

    /// Owned copy of all slots
    pub fn snapshot(&self) -> Vec<Vec3> {
        self.points.clone()
    }

    /// Overwrite every slot with a fully computed frame
    ///
    /// # Panics
    /// If `frame` does not hold exactly one point per slot. The processor sizes
    /// its scratch from the same grid, so a mismatch is a logic bug.
    pub fn overwrite(&mut self, frame: &[Vec3]) {
        assert_eq!(
            frame.len(),
            self.points.len(),
            "{}",
            PointCloudError::InvalidGridIndex {
                index: frame.len(),
                capacity: self.points.len(),
            }
        );
        self.points.copy_from_slice(frame);
    }
}

/// Point cloud buffer shared between the frame pass and its readers
///
/// The lock is only held to commit a finished frame or to copy a snapshot.
#[derive(Debug, Clone)]
pub struct SharedPointCloud {
    inner: Arc<Mutex<PointCloudBuffer>>,
}

impl SharedPointCloud {
    pub fn new(buffer: PointCloudBuffer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(buffer)),
        }
    }

    /// Lock the buffer
    ///
    /// A poisoned lock is recovered: the buffer is only mutated by whole-frame
    /// copies, so its contents are still a complete frame.
    pub fn lock(&self) -> MutexGuard<'_, PointCloudBuffer> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy the current contents
    pub fn snapshot(&self) -> Vec<Vec3> {
        self.lock().snapshot()
    }

    /// Slot count (constant)
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
