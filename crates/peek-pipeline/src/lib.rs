// peek-pipeline/src/lib.rs
// ============================================================
// Vision processing stage for peek
// Frame → detector (worker thread) → results posted through a
// ScopedExecutor → overlay graphics.
// ------------------------------------------------------------
// Public API
//   * VisionDetector        – backend-specific detect + draw
//   * ProcessorBase         – threading, overlay updates, stop()
//   * FaceDetector / ObjectDetector – ready-made detectors
//   * ProcessorConfig       – JSON-loadable settings
// ------------------------------------------------------------
// After stop() no result callback starts; a callback that is
// already running finishes. See peek-dispatch.
// ============================================================

//! peek – pipeline layer
//!
//! A [`ProcessorBase`] owns one processing session. Each [`Frame`] is handed
//! to a worker executor for detection; the outcome is delivered on the
//! results executor (typically the render thread's
//! [`Looper`](peek_dispatch::Looper)), where the overlay is cleared and
//! refilled. Stopping the processor shuts the results executor down, so
//! late detections never reach the overlay.

use peek_overlay::{Overlay, OverlayError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

mod config;
mod face;
mod object;
mod processor;
mod scripted;

pub use config::{LensFacing, ProcessorConfig};
pub use face::{FaceBackend, FaceDetector};
pub use object::{ObjectBackend, ObjectDetector};
pub use processor::ProcessorBase;
pub use scripted::Scripted;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("detector backend failed: {0}")]
    Backend(String),
    #[error("frame {width}x{height} rejected: {reason}")]
    InvalidFrame { width: u32, height: u32, reason: String },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("overlay rejected frame geometry: {0}")]
    Overlay(#[from] OverlayError),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// One camera frame as delivered by the capture layer.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Clockwise rotation needed to show the frame upright (0/90/180/270).
    pub rotation_degrees: u32,
    pub pts: Duration,
    pub pixels: Arc<[u8]>,
}

impl Frame {
    pub fn new(width: u32, height: u32, rotation_degrees: u32, pixels: impl Into<Arc<[u8]>>) -> Self {
        Self { width, height, rotation_degrees, pts: Duration::ZERO, pixels: pixels.into() }
    }

    /// Frame without pixel data, for backends that only need geometry.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(width, height, 0, Vec::<u8>::new())
    }

    pub fn with_pts(mut self, pts: Duration) -> Self {
        self.pts = pts;
        self
    }
}

/// Backend-specific half of a processor: run detection, turn results into
/// graphics.
pub trait VisionDetector: Send + Sync + 'static {
    type Output: Send + 'static;

    fn name(&self) -> &str;

    /// Runs on a worker thread.
    fn detect_in_image(&self, frame: &Frame) -> std::result::Result<Self::Output, DetectError>;

    /// Runs on the results executor, after the overlay has been cleared.
    fn on_success(&self, results: Self::Output, overlay: &Overlay);

    fn on_failure(&self, error: &DetectError) {
        log::error!("{} detection failed: {}", self.name(), error);
    }
}

/// Entry point used by the capture loop.
pub trait VisionProcessor: Send + Sync {
    fn process(&self, frame: Frame, overlay: &Arc<Overlay>) -> Result<()>;
    fn stop(&self);
}
