// SPDX-License-Identifier: GPL-3.0-only
//! Thread lifecycle for sensor frame loops
//!
//! Pulls frames from a [`DepthSource`] on a dedicated thread, hands each one
//! to a callback and paces the loop to the sensor frame interval.

use super::{DepthSource, SensorFrame};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Action returned by the frame callback to control loop behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Continue,
    Stop,
}

/// Controller for a frame loop running in a separate thread
///
/// The loop ends when the callback returns [`LoopAction::Stop`], the source
/// runs out of frames, or [`stop`](Self::stop) is called. Dropping the
/// controller stops and joins the thread.
pub struct FrameLoopController {
    thread_handle: Option<JoinHandle<u64>>,
    stop_signal: Arc<AtomicBool>,
    name: String,
}

impl FrameLoopController {
    /// Start delivering frames from `source` to `on_frame`
    ///
    /// `interval` is the minimum time between frames; zero runs as fast as
    /// the source produces them.
    pub fn start<S, F>(mut source: S, interval: Duration, mut on_frame: F) -> Self
    where
        S: DepthSource + 'static,
        F: FnMut(SensorFrame) -> LoopAction + Send + 'static,
    {
        let stop_signal = Arc::new(AtomicBool::new(false));
        let stop_signal_clone = Arc::clone(&stop_signal);
        let name = source.name().to_string();
        let name_clone = name.clone();

        info!(name = %name, interval_ms = interval.as_millis() as u64, "Starting frame loop");

        let thread_handle = thread::spawn(move || {
            let mut delivered = 0u64;

            loop {
                if stop_signal_clone.load(Ordering::SeqCst) {
                    debug!(name = %name_clone, "Stop signal received");
                    break;
                }

                let tick = Instant::now();
                let Some(frame) = source.next_frame() else {
                    debug!(name = %name_clone, "Source exhausted");
                    break;
                };
                delivered += 1;

                if on_frame(frame) == LoopAction::Stop {
                    debug!(name = %name_clone, "Loop requested stop");
                    break;
                }

                if let Some(remaining) = interval.checked_sub(tick.elapsed()) {
                    thread::sleep(remaining);
                }
            }

            info!(name = %name_clone, frames = delivered, "Frame loop thread exiting");
            delivered
        });

        Self {
            thread_handle: Some(thread_handle),
            stop_signal,
            name,
        }
    }

    /// Check if the loop is still running
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Signal the loop to stop without waiting
    pub fn request_stop(&self) {
        debug!(name = %self.name, "Requesting frame loop stop");
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Stop the loop and wait for the thread, returning the number of frames delivered
    pub fn stop(&mut self) -> u64 {
        self.request_stop();
        self.join()
    }

    /// Wait for the loop to end on its own, returning the number of frames delivered
    pub fn join(&mut self) -> u64 {
        let Some(handle) = self.thread_handle.take() else {
            return 0;
        };
        match handle.join() {
            Ok(delivered) => delivered,
            Err(e) => {
                warn!(name = %self.name, "Frame loop thread panicked: {:?}", e);
                0
            }
        }
    }
}

impl Drop for FrameLoopController {
    fn drop(&mut self) {
        if self.thread_handle.is_some() {
            debug!(name = %self.name, "FrameLoopController dropped, stopping loop");
            self.stop();
        }
    }
}
