use crate::{DetectError, Frame, LensFacing, Result, VisionDetector, VisionProcessor};
use log::{debug, trace};
use peek_dispatch::{Executor, ScopedExecutor};
use peek_overlay::Overlay;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Threading and overlay bookkeeping shared by every detector.
///
/// * `W` runs detection (a [`WorkerPool`](peek_dispatch::WorkerPool) or similar).
/// * `R` receives results; wrapped in a [`ScopedExecutor`] that `stop()` shuts.
pub struct ProcessorBase<D, W, R> {
    detector: Arc<D>,
    worker: W,
    results: ScopedExecutor<R>,
    lens_facing: LensFacing,
    needs_source_update: AtomicBool,
}

impl<D, W, R> ProcessorBase<D, W, R>
where
    D: VisionDetector,
    W: Executor,
    R: Executor + Clone + 'static,
{
    pub fn new(detector: D, worker: W, results: R) -> Self {
        Self {
            detector: Arc::new(detector),
            worker,
            results: ScopedExecutor::new(results),
            lens_facing: LensFacing::default(),
            needs_source_update: AtomicBool::new(true),
        }
    }

    pub fn with_lens_facing(mut self, lens_facing: LensFacing) -> Self {
        self.lens_facing = lens_facing;
        self
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn is_stopped(&self) -> bool {
        self.results.is_shutdown()
    }

    /// Re-send image source info to the overlay with the next frame, e.g.
    /// after the camera stream was reconfigured.
    pub fn reset_source_info(&self) {
        self.needs_source_update.store(true, Ordering::Release);
    }

    fn update_source_info(&self, frame: &Frame, overlay: &Overlay) -> Result<()> {
        if !self.needs_source_update.load(Ordering::Acquire) {
            return Ok(());
        }
        overlay.configure_for_frame(
            frame.width,
            frame.height,
            frame.rotation_degrees,
            self.lens_facing.is_mirrored(),
        )?;
        self.needs_source_update.store(false, Ordering::Release);
        debug!(
            "{}: overlay source set from {}x{} frame, rotation {}",
            self.detector.name(),
            frame.width,
            frame.height,
            frame.rotation_degrees
        );
        Ok(())
    }
}

/// Result callback body: runs on the results executor.
fn deliver<D: VisionDetector>(
    detector: &D,
    outcome: std::result::Result<D::Output, DetectError>,
    overlay: &Overlay,
) {
    overlay.clear();
    match outcome {
        Ok(results) => {
            detector.on_success(results, overlay);
            overlay.request_redraw();
        }
        Err(error) => {
            overlay.request_redraw();
            detector.on_failure(&error);
        }
    }
}

impl<D, W, R> VisionProcessor for ProcessorBase<D, W, R>
where
    D: VisionDetector,
    W: Executor,
    R: Executor + Clone + 'static,
{
    fn process(&self, frame: Frame, overlay: &Arc<Overlay>) -> Result<()> {
        if self.is_stopped() {
            return Ok(());
        }
        self.update_source_info(&frame, overlay)?;

        let detector = Arc::clone(&self.detector);
        let results = self.results.clone();
        let overlay = Arc::clone(overlay);

        self.worker.execute(Box::new(move || {
            // stopped while queued: skip the expensive part too
            if results.is_shutdown() {
                trace!("{}: processor stopped, skipping detection", detector.name());
                return;
            }
            let outcome = detector.detect_in_image(&frame);
            drop(frame);

            let d = Arc::clone(&detector);
            if !results.submit(move || deliver(&*d, outcome, &overlay)) {
                trace!("{}: processor stopped, dropping results", detector.name());
            }
        }));
        Ok(())
    }

    fn stop(&self) {
        self.results.shutdown();
        debug!("{}: processor stopped", self.detector.name());
    }
}
