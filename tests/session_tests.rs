// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the meshing session lifecycle

use depthmesh::backends::sensor::SensorFrame;
use depthmesh::config::GridConfig;
use depthmesh::depth::{CameraIntrinsics, DepthMap};
use depthmesh::{Config, FrameOutcome, MeshingSession, ReconstructionError, Reconstructor, ViewState};
use glam::{Mat4, Vec3};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};

const STUB_MESH: &str = "/tmp/depthmesh-stub/mesh.obj";

/// Reconstructor that records calls and returns a fixed path without touching disk
struct StubReconstructor {
    calls: AtomicUsize,
    last_len: AtomicUsize,
}

impl StubReconstructor {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_len: AtomicUsize::new(0),
        })
    }
}

impl Reconstructor for StubReconstructor {
    fn reconstruct(&self, points: &[Vec3], _output_path: &Path) -> Result<PathBuf, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_len.store(points.len(), Ordering::SeqCst);
        Ok(PathBuf::from(STUB_MESH))
    }
}

fn reference_frame(depth: Option<DepthMap>, inverse_view: Mat4) -> SensorFrame {
    SensorFrame::new(
        depth,
        CameraIntrinsics::new(1450.0, 1450.0, 960.0, 720.0),
        1920,
        1440,
        inverse_view,
    )
}

fn small_config() -> Config {
    Config {
        grid: GridConfig {
            horizontal_points: 16,
            vertical_points: 12,
        },
        ..Config::default()
    }
}

fn bits(points: &[Vec3]) -> Vec<[u32; 3]> {
    points
        .iter()
        .map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
        .collect()
}

#[test]
fn test_buffer_length_constant_across_frames() {
    let stub = StubReconstructor::new();
    let session = MeshingSession::new(&Config::default(), stub, PathBuf::from(STUB_MESH));
    assert_eq!(session.snapshot().len(), 128 * 96);

    for (i, depth) in [1.0f32, 2.5, 0.0].into_iter().enumerate() {
        let frame = reference_frame(
            Some(DepthMap::filled(256, 192, depth)),
            Mat4::from_translation(Vec3::new(i as f32, 0.0, 0.0)),
        );
        assert!(matches!(session.on_frame(&frame), FrameOutcome::Updated { .. }));
        assert_eq!(session.snapshot().len(), 128 * 96);
    }
}

#[test]
fn test_missing_depth_keeps_points_bit_for_bit() {
    let stub = StubReconstructor::new();
    let session = MeshingSession::new(&small_config(), stub, PathBuf::from(STUB_MESH));

    let pose = Mat4::from_rotation_y(0.4) * Mat4::from_translation(Vec3::new(0.1, 0.2, 0.3));
    session.on_frame(&reference_frame(Some(DepthMap::filled(256, 192, 1.7)), pose));
    let before = bits(&session.snapshot());

    let outcome = session.on_frame(&reference_frame(None, Mat4::IDENTITY));
    assert!(matches!(outcome, FrameOutcome::Skipped(_)));
    assert_eq!(bits(&session.snapshot()), before);
}

#[tokio::test]
async fn test_empty_snapshot_stays_point_cloud() {
    let stub = StubReconstructor::new();
    let config = Config {
        grid: GridConfig {
            horizontal_points: 0,
            vertical_points: 0,
        },
        ..Config::default()
    };
    let session = MeshingSession::new(&config, stub.clone(), PathBuf::from(STUB_MESH));

    assert_eq!(session.toggle().await, Err(ReconstructionError::EmptyInput));
    assert_eq!(session.view_state(), ViewState::PointCloud);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_round_trip_with_stub() {
    let stub = StubReconstructor::new();
    let session = MeshingSession::new(&small_config(), stub.clone(), PathBuf::from(STUB_MESH));
    let mut rx = session.subscribe();

    session.on_frame(&reference_frame(
        Some(DepthMap::filled(256, 192, 2.0)),
        Mat4::IDENTITY,
    ));
    let points_before = session.snapshot();

    assert_eq!(session.toggle().await, Ok(ViewState::Mesh));
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), ViewState::Mesh);
    assert_eq!(session.mesh_path(), Some(PathBuf::from(STUB_MESH)));
    assert_eq!(stub.last_len.load(Ordering::SeqCst), 16 * 12);

    assert_eq!(session.toggle().await, Ok(ViewState::PointCloud));
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), ViewState::PointCloud);
    assert_eq!(session.mesh_path(), None);

    // Going back never reconstructs and never touches the buffer
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.snapshot(), points_before);
}

#[tokio::test]
async fn test_failed_reconstruction_keeps_point_cloud() {
    let failing =
        |_: &[Vec3], _: &Path| -> Result<PathBuf, String> { Err("no mesh produced".to_string()) };
    let session = MeshingSession::new(&small_config(), Arc::new(failing), PathBuf::from(STUB_MESH));

    let result = session.toggle().await;
    assert_eq!(
        result,
        Err(ReconstructionError::ReconstructionFailed(
            "no mesh produced".to_string()
        ))
    );
    assert_eq!(session.view_state(), ViewState::PointCloud);
    assert_eq!(session.mesh_path(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_second_request_while_busy_is_rejected() {
    let (entered_tx, entered_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let entered_tx = Mutex::new(entered_tx);
    let release_rx = Mutex::new(release_rx);

    let blocking = move |_: &[Vec3], path: &Path| -> Result<PathBuf, String> {
        let _ = entered_tx.lock().unwrap().send(());
        let _ = release_rx.lock().unwrap().recv();
        Ok(path.to_path_buf())
    };
    let session = Arc::new(MeshingSession::new(
        &small_config(),
        Arc::new(blocking),
        PathBuf::from(STUB_MESH),
    ));

    let first = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.request_mesh().await })
    };

    tokio::task::spawn_blocking(move || entered_rx.recv())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(session.request_mesh().await, Err(ReconstructionError::Busy));
    assert_eq!(session.view_state(), ViewState::PointCloud);

    release_tx.send(()).unwrap();
    assert_eq!(first.await.unwrap(), Ok(PathBuf::from(STUB_MESH)));
    assert_eq!(session.view_state(), ViewState::Mesh);
}

#[test]
fn test_projected_plane_faces_camera() {
    let stub = StubReconstructor::new();
    let session = MeshingSession::new(&small_config(), stub, PathBuf::from(STUB_MESH));
    let pose = Mat4::from_translation(Vec3::new(0.0, 1.5, 0.0));

    session.on_frame(&reference_frame(Some(DepthMap::filled(256, 192, 2.0)), pose));

    // Constant depth maps to a plane 2m in front of the camera
    for p in session.snapshot() {
        assert!((p.z + 2.0).abs() < 1e-5);
    }
    let buffer = session.cloud().lock();
    let top_left = buffer.get(0, 0).unwrap();
    let bottom_right = buffer.get(15, 11).unwrap();
    assert!(top_left.x < 0.0 && top_left.y > 1.5);
    assert!(bottom_right.x > 0.0 && bottom_right.y < 1.5);
}
