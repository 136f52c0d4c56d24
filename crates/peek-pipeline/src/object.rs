use crate::{DetectError, Frame, ProcessorConfig, VisionDetector};
use peek_graphics::{BoxGraphic, Detection};
use peek_overlay::Overlay;

pub trait ObjectBackend: Send + Sync + 'static {
    fn detect_objects(&self, frame: &Frame) -> Result<Vec<Detection>, DetectError>;
}

/// Draws a [`BoxGraphic`] for every detection above `min_score`.
pub struct ObjectDetector<B> {
    backend: B,
    min_score: f32,
    show_labels: bool,
}

impl<B: ObjectBackend> ObjectDetector<B> {
    pub fn new(backend: B, config: &ProcessorConfig) -> Self {
        Self { backend, min_score: config.min_score, show_labels: config.show_labels }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: ObjectBackend> VisionDetector for ObjectDetector<B> {
    type Output = Vec<Detection>;

    fn name(&self) -> &str {
        "ObjectDetector"
    }

    fn detect_in_image(&self, frame: &Frame) -> Result<Vec<Detection>, DetectError> {
        let mut dets = self.backend.detect_objects(frame)?;
        dets.retain(|d| d.score >= self.min_score);
        Ok(dets)
    }

    fn on_success(&self, detections: Vec<Detection>, overlay: &Overlay) {
        for det in detections {
            overlay.add(BoxGraphic::new(det).show_label(self.show_labels));
        }
    }
}
