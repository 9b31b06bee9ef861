// SPDX-License-Identifier: GPL-3.0-only

//! Per-frame depth to point cloud update pass

use super::SharedPointCloud;
use crate::backends::sensor::SensorFrame;
use crate::constants::SENTINEL_POSITION;
use crate::depth::{AdjustedIntrinsics, DepthFilter, DepthMap, GridSampler, unproject_to_world};
use crate::errors::PointCloudError;
use glam::{Mat4, Vec2, Vec3};
use tracing::{debug, trace};

/// What a frame did to the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Every slot was overwritten; `filtered` slots hold the sentinel
    Updated { points: usize, filtered: usize },
    /// Nothing was written, previous contents stay authoritative
    Skipped(PointCloudError),
    /// Another frame was still being processed
    Dropped,
}

/// Projects the sampling grid of each depth frame into the shared buffer
///
/// A frame is computed completely into a private scratch buffer first and
/// then committed with a single copy under the buffer lock.
pub struct PointCloudProcessor {
    cloud: SharedPointCloud,
    horizontal_points: usize,
    vertical_points: usize,
    filter: Option<DepthFilter>,
    scratch: Vec<Vec3>,
    frames_processed: u64,
    frames_skipped: u64,
}

impl PointCloudProcessor {
    /// Create a processor writing into `cloud`; the grid is taken from the buffer
    pub fn new(cloud: SharedPointCloud, filter: Option<DepthFilter>) -> Self {
        let (horizontal_points, vertical_points, len) = {
            let buffer = cloud.lock();
            (buffer.horizontal_points(), buffer.vertical_points(), buffer.len())
        };

        Self {
            cloud,
            horizontal_points,
            vertical_points,
            filter,
            scratch: vec![SENTINEL_POSITION; len],
            frames_processed: 0,
            frames_skipped: 0,
        }
    }

    /// Run the update pass for one sensor frame
    pub fn on_frame(&mut self, frame: &SensorFrame) -> FrameOutcome {
        let Some(depth) = frame.depth.as_ref().filter(|d| !d.is_empty()) else {
            return self.skip(PointCloudError::MissingDepthFrame);
        };

        let Some(intrinsics) = frame.camera_intrinsics().adjust_to_depth(
            frame.image_width,
            frame.image_height,
            depth.width(),
            depth.height(),
        ) else {
            return self.skip(PointCloudError::MissingDepthFrame);
        };

        let filtered = self.project_into_scratch(depth, &intrinsics, &frame.inverse_view);

        self.cloud.lock().overwrite(&self.scratch);
        self.frames_processed += 1;

        trace!(
            frame = self.frames_processed,
            depth_resolution = format!("{}x{}", depth.width(), depth.height()),
            filtered,
            "Point cloud updated"
        );

        FrameOutcome::Updated {
            points: self.scratch.len(),
            filtered,
        }
    }

    /// Fill the scratch buffer from one depth map, returning how many cells were filtered
    fn project_into_scratch(
        &mut self,
        depth: &DepthMap,
        intrinsics: &AdjustedIntrinsics,
        inverse_view: &Mat4,
    ) -> usize {
        let sampler = GridSampler::new(
            self.horizontal_points,
            self.vertical_points,
            depth.width(),
            depth.height(),
        );
        let mut filtered = 0;

        for v in 0..self.vertical_points {
            for h in 0..self.horizontal_points {
                let (x, y) = sampler.pixel_for(h, v);
                let metric_depth = depth.sample(x, y);
                let index = v * self.horizontal_points + h;

                if let Some(filter) = &self.filter
                    && !filter.accepts(metric_depth)
                {
                    self.scratch[index] = SENTINEL_POSITION;
                    filtered += 1;
                    continue;
                }

                self.scratch[index] = unproject_to_world(
                    Vec2::new(x as f32, y as f32),
                    metric_depth,
                    intrinsics,
                    inverse_view,
                );
            }
        }

        filtered
    }

    fn skip(&mut self, reason: PointCloudError) -> FrameOutcome {
        self.frames_skipped += 1;
        debug!(
            reason = %reason,
            skipped = self.frames_skipped,
            "Skipping frame, keeping previous point cloud"
        );
        FrameOutcome::Skipped(reason)
    }

    /// Frames that updated the buffer
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Frames skipped for lack of depth
    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }

    /// Buffer this processor writes to
    pub fn cloud(&self) -> &SharedPointCloud {
        &self.cloud
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::CameraIntrinsics;
    use crate::point_cloud::PointCloudBuffer;

    fn frame(depth: Option<DepthMap>) -> SensorFrame {
        SensorFrame::new(
            depth,
            CameraIntrinsics::new(80.0, 80.0, 16.0, 12.0),
            32,
            24,
            Mat4::IDENTITY,
        )
    }

    fn processor(h: usize, v: usize, filter: Option<DepthFilter>) -> PointCloudProcessor {
        PointCloudProcessor::new(SharedPointCloud::new(PointCloudBuffer::new(h, v)), filter)
    }

    #[test]
    fn test_constant_depth_plane() {
        let mut processor = processor(8, 6, None);
        let outcome = processor.on_frame(&frame(Some(DepthMap::filled(32, 24, 2.0))));
        assert_eq!(outcome, FrameOutcome::Updated { points: 48, filtered: 0 });

        let points = processor.cloud().snapshot();
        assert_eq!(points.len(), 48);
        assert!(points.iter().all(|p| (p.z + 2.0).abs() < 1e-6));
    }

    #[test]
    fn test_grid_order_left_to_right_top_to_bottom() {
        let mut processor = processor(4, 3, None);
        processor.on_frame(&frame(Some(DepthMap::filled(32, 24, 1.0))));
        let buffer = processor.cloud().lock();

        // Columns move right (+X), rows move down (-Y)
        assert!(buffer.get(1, 0).unwrap().x > buffer.get(0, 0).unwrap().x);
        assert!(buffer.get(0, 1).unwrap().y < buffer.get(0, 0).unwrap().y);
    }

    #[test]
    fn test_missing_depth_keeps_buffer() {
        let mut processor = processor(4, 3, None);
        processor.on_frame(&frame(Some(DepthMap::filled(32, 24, 1.5))));
        let before = processor.cloud().snapshot();

        let outcome = processor.on_frame(&frame(None));
        assert_eq!(outcome, FrameOutcome::Skipped(PointCloudError::MissingDepthFrame));
        assert_eq!(processor.cloud().snapshot(), before);
        assert_eq!(processor.frames_processed(), 1);
        assert_eq!(processor.frames_skipped(), 1);
    }

    #[test]
    fn test_zero_resolution_is_missing_frame() {
        let mut processor = processor(4, 3, None);
        let empty = DepthMap::new(0, 0, Vec::<f32>::new()).unwrap();
        let outcome = processor.on_frame(&frame(Some(empty)));
        assert_eq!(outcome, FrameOutcome::Skipped(PointCloudError::MissingDepthFrame));
        assert!(
            processor
                .cloud()
                .snapshot()
                .iter()
                .all(|p| *p == SENTINEL_POSITION)
        );
    }

    #[test]
    fn test_filter_writes_sentinel() {
        let mut data = vec![2.0f32; 32 * 24];
        // Zero out the top-left cell's sample (pixel 2, 2 for a 8x6 grid on 32x24)
        data[2 * 32 + 2] = 0.0;
        let depth = DepthMap::new(32, 24, data).unwrap();

        let mut processor = processor(8, 6, Some(DepthFilter::default()));
        let outcome = processor.on_frame(&frame(Some(depth)));
        assert_eq!(outcome, FrameOutcome::Updated { points: 48, filtered: 1 });
        assert_eq!(processor.cloud().lock().get(0, 0).unwrap(), SENTINEL_POSITION);
    }

    #[test]
    fn test_zero_depth_unfiltered_passes_through() {
        let mut processor = processor(2, 2, None);
        processor.on_frame(&frame(Some(DepthMap::filled(32, 24, 0.0))));
        assert!(processor.cloud().snapshot().iter().all(|p| *p == Vec3::ZERO));
    }
}
