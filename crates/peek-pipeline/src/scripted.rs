// Replays pre-recorded detections, one list per frame, cycling at the end.
// Stands in for a model in demos and tests.

use crate::{DetectError, FaceBackend, Frame, ObjectBackend, Result};
use peek_graphics::{Detection, Face};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct Scripted<T> {
    frames: Vec<Vec<T>>,
    cursor: AtomicUsize,
}

impl<T: Clone> Scripted<T> {
    pub fn new(frames: Vec<Vec<T>>) -> Self {
        Self { frames, cursor: AtomicUsize::new(0) }
    }

    /// Number of frames handed out so far.
    pub fn calls(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    fn next(&self, frame: &Frame) -> std::result::Result<Vec<T>, DetectError> {
        if self.frames.is_empty() {
            return Err(DetectError::Backend("no scripted frames".into()));
        }
        if frame.width == 0 || frame.height == 0 {
            return Err(DetectError::InvalidFrame {
                width: frame.width,
                height: frame.height,
                reason: "empty frame".into(),
            });
        }
        let idx = self.cursor.fetch_add(1, Ordering::AcqRel);
        Ok(self.frames[idx % self.frames.len()].clone())
    }
}

impl<T: Clone + DeserializeOwned> Scripted<T> {
    /// Load a JSON array of per-frame arrays.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&text)?))
    }
}

impl FaceBackend for Scripted<Face> {
    fn detect_faces(&self, frame: &Frame) -> std::result::Result<Vec<Face>, DetectError> {
        self.next(frame)
    }
}

impl ObjectBackend for Scripted<Detection> {
    fn detect_objects(&self, frame: &Frame) -> std::result::Result<Vec<Detection>, DetectError> {
        self.next(frame)
    }
}
