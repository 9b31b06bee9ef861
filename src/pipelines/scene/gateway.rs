// SPDX-License-Identifier: GPL-3.0-only

//! Boundary between the point cloud and the reconstruction routine

use super::Reconstructor;
use crate::errors::ReconstructionError;
use glam::Vec3;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Path of the written mesh, or why there is none
pub type ReconstructionResult = Result<PathBuf, ReconstructionError>;

/// Serialized access to a [`Reconstructor`]
///
/// At most one reconstruction runs at a time; a request made while another
/// is outstanding is rejected with [`ReconstructionError::Busy`].
#[derive(Clone)]
pub struct ReconstructionGateway {
    reconstructor: Arc<dyn Reconstructor>,
    output_path: PathBuf,
    busy: Arc<AtomicBool>,
}

impl ReconstructionGateway {
    pub fn new(reconstructor: Arc<dyn Reconstructor>, output_path: PathBuf) -> Self {
        Self {
            reconstructor,
            output_path,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Where meshes are written
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// True while a reconstruction is running
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Reconstruct on the calling thread
    pub fn reconstruct(&self, points: &[Vec3]) -> ReconstructionResult {
        if points.is_empty() {
            warn!("Point cloud is empty, not reconstructing");
            return Err(ReconstructionError::EmptyInput);
        }

        let _guard = BusyGuard::acquire(&self.busy)?;
        run_reconstructor(self.reconstructor.as_ref(), points, &self.output_path)
    }

    /// Reconstruct an owned snapshot on a blocking worker
    ///
    /// The busy flag is taken before the worker starts and released when it
    /// finishes, even if the routine panics.
    pub async fn reconstruct_async(&self, points: Vec<Vec3>) -> ReconstructionResult {
        if points.is_empty() {
            warn!("Point cloud is empty, not reconstructing");
            return Err(ReconstructionError::EmptyInput);
        }

        let guard = BusyGuard::acquire(&self.busy)?;
        let reconstructor = Arc::clone(&self.reconstructor);
        let output_path = self.output_path.clone();

        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            run_reconstructor(reconstructor.as_ref(), &points, &output_path)
        })
        .await
        .map_err(|e| ReconstructionError::ReconstructionFailed(format!("Task join error: {}", e)))?
    }
}

fn run_reconstructor(
    reconstructor: &dyn Reconstructor,
    points: &[Vec3],
    output_path: &Path,
) -> ReconstructionResult {
    let started = Instant::now();
    info!(
        point_count = points.len(),
        reconstructor = reconstructor.name(),
        path = %output_path.display(),
        "Starting mesh reconstruction"
    );

    match reconstructor.reconstruct(points, output_path) {
        Ok(path) => {
            info!(
                path = %path.display(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Mesh saved"
            );
            Ok(path)
        }
        Err(e) => {
            warn!(error = %e, "Mesh reconstruction failed");
            Err(ReconstructionError::ReconstructionFailed(e))
        }
    }
}

/// Holds the gateway's busy flag for the lifetime of one reconstruction
struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, ReconstructionError> {
        if flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Rejecting reconstruction request, one is already running");
            return Err(ReconstructionError::Busy);
        }
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;

    fn fixed_path_gateway(calls: Arc<AtomicUsize>) -> ReconstructionGateway {
        let stub = move |_points: &[Vec3], path: &Path| -> Result<PathBuf, String> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(path.to_path_buf())
        };
        ReconstructionGateway::new(Arc::new(stub), PathBuf::from("/tmp/stub/mesh.obj"))
    }

    #[test]
    fn test_empty_input_skips_routine() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gateway = fixed_path_gateway(Arc::clone(&calls));

        assert_eq!(gateway.reconstruct(&[]), Err(ReconstructionError::EmptyInput));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_success_returns_path() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gateway = fixed_path_gateway(Arc::clone(&calls));

        let result = gateway.reconstruct(&[Vec3::ZERO, Vec3::X]);
        assert_eq!(result, Ok(PathBuf::from("/tmp/stub/mesh.obj")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!gateway.is_busy());
    }

    #[test]
    fn test_routine_failure_surfaces() {
        let failing =
            |_: &[Vec3], _: &Path| -> Result<PathBuf, String> { Err("no output".to_string()) };
        let gateway = ReconstructionGateway::new(Arc::new(failing), PathBuf::from("mesh.obj"));

        assert_eq!(
            gateway.reconstruct(&[Vec3::ONE]),
            Err(ReconstructionError::ReconstructionFailed("no output".to_string()))
        );
        assert!(!gateway.is_busy());
    }

    #[test]
    fn test_concurrent_request_rejected() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let release_rx = std::sync::Mutex::new(release_rx);

        let blocking = move |_: &[Vec3], path: &Path| -> Result<PathBuf, String> {
            let _ = entered_tx.send(());
            let _ = release_rx.lock().unwrap().recv();
            Ok(path.to_path_buf())
        };
        let gateway = ReconstructionGateway::new(Arc::new(blocking), PathBuf::from("mesh.obj"));

        let worker = {
            let gateway = gateway.clone();
            std::thread::spawn(move || gateway.reconstruct(&[Vec3::ONE]))
        };

        entered_rx.recv().unwrap();
        assert!(gateway.is_busy());
        assert_eq!(gateway.reconstruct(&[Vec3::ONE]), Err(ReconstructionError::Busy));

        release_tx.send(()).unwrap();
        assert!(worker.join().unwrap().is_ok());
        assert!(!gateway.is_busy());
    }

    #[tokio::test]
    async fn test_async_releases_busy_after_panic() {
        let panicking = |_: &[Vec3], _: &Path| -> Result<PathBuf, String> {
            panic!("routine crashed");
        };
        let gateway = ReconstructionGateway::new(Arc::new(panicking), PathBuf::from("mesh.obj"));

        let result = gateway.reconstruct_async(vec![Vec3::ONE]).await;
        assert!(matches!(result, Err(ReconstructionError::ReconstructionFailed(_))));
        assert!(!gateway.is_busy());
    }
}
