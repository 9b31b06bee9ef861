// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the projection and reconstruction pipeline

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Per-frame projection errors
    PointCloud(PointCloudError),
    /// Mesh reconstruction errors
    Reconstruction(ReconstructionError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Sensor/frame source errors
    Source(String),
    /// Generic error with message
    Other(String),
}

/// Errors raised while turning a depth frame into points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointCloudError {
    /// No usable depth plane this tick; the frame is skipped
    MissingDepthFrame,
    /// Depth buffer length does not match its declared resolution
    InvalidDepthMap { expected: usize, actual: usize },
    /// Grid index outside the buffer (configuration/logic bug)
    InvalidGridIndex { index: usize, capacity: usize },
}

/// Errors surfaced to whoever triggered a reconstruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconstructionError {
    /// The point snapshot was empty, the routine was not invoked
    EmptyInput,
    /// Another reconstruction is still running
    Busy,
    /// The routine failed or could not write its artifact
    ReconstructionFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::PointCloud(e) => write!(f, "Point cloud error: {}", e),
            AppError::Reconstruction(e) => write!(f, "Reconstruction error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Source(msg) => write!(f, "Frame source error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for PointCloudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointCloudError::MissingDepthFrame => write!(f, "No depth data in frame"),
            PointCloudError::InvalidDepthMap { expected, actual } => write!(
                f,
                "Depth buffer has {} values, expected {}",
                actual, expected
            ),
            PointCloudError::InvalidGridIndex { index, capacity } => write!(
                f,
                "Grid index {} out of range for {} slots",
                index, capacity
            ),
        }
    }
}

impl fmt::Display for ReconstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconstructionError::EmptyInput => write!(f, "Point cloud is empty"),
            ReconstructionError::Busy => write!(f, "Reconstruction already in progress"),
            ReconstructionError::ReconstructionFailed(msg) => {
                write!(f, "Reconstruction failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for PointCloudError {}
impl std::error::Error for ReconstructionError {}

impl From<PointCloudError> for AppError {
    fn from(err: PointCloudError) -> Self {
        AppError::PointCloud(err)
    }
}

impl From<ReconstructionError> for AppError {
    fn from(err: ReconstructionError) -> Self {
        AppError::Reconstruction(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<std::io::Error> for ReconstructionError {
    fn from(err: std::io::Error) -> Self {
        ReconstructionError::ReconstructionFailed(err.to_string())
    }
}
