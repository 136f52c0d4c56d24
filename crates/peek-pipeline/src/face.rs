use crate::{DetectError, Frame, VisionDetector};
use peek_graphics::{Face, FaceGraphic};
use peek_overlay::Overlay;

/// Anything that finds faces in a frame: an ONNX model, a remote service,
/// a scripted replay.
pub trait FaceBackend: Send + Sync + 'static {
    fn detect_faces(&self, frame: &Frame) -> Result<Vec<Face>, DetectError>;
}

/// Draws one [`FaceGraphic`] per detected face.
pub struct FaceDetector<B> {
    backend: B,
}

impl<B: FaceBackend> FaceDetector<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: FaceBackend> VisionDetector for FaceDetector<B> {
    type Output = Vec<Face>;

    fn name(&self) -> &str {
        "FaceDetector"
    }

    fn detect_in_image(&self, frame: &Frame) -> Result<Vec<Face>, DetectError> {
        self.backend.detect_faces(frame)
    }

    fn on_success(&self, faces: Vec<Face>, overlay: &Overlay) {
        for face in faces {
            overlay.add(FaceGraphic::new(face));
        }
    }
}
