//! peek‑graphics – concrete overlay graphics.
//!
//! * [`BoxGraphic`]   – detector bounding box with class/score label
//! * [`FaceGraphic`]  – face box, landmarks, contour, id and probabilities
//! * [`LabelGraphic`] – fixed view-space text (status readouts)
//! * [`ImageSurface`] – draws onto an `image::RgbaImage`
//!
//! Detection records are plain `serde` structs so scripted or remote
//! detectors can feed them in as JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod boxes;
mod face;
mod label;
mod raster;

pub use boxes::BoxGraphic;
pub use face::FaceGraphic;
pub use label::LabelGraphic;
pub use raster::ImageSurface;

#[derive(Error, Debug)]
pub enum GraphicsError {
    #[error("image encode/decode failed: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, GraphicsError>;

/// A single detection: bounding box [x1,y1,x2,y2] in image pixels plus score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: [f32; 4],
    pub score: f32,
    pub class: usize,
    #[serde(default)]
    pub label: Option<String>,
}

/// A detected face, image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Face {
    pub bbox: [f32; 4],
    #[serde(default)]
    pub tracking_id: Option<u32>,
    #[serde(default)]
    pub landmarks: Vec<FaceLandmark>,
    #[serde(default)]
    pub contour: Vec<[f32; 2]>,
    #[serde(default)]
    pub smiling_probability: Option<f32>,
    #[serde(default)]
    pub left_eye_open_probability: Option<f32>,
    #[serde(default)]
    pub right_eye_open_probability: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkKind {
    LeftEye,
    RightEye,
    NoseBase,
    MouthLeft,
    MouthRight,
    MouthBottom,
    LeftCheek,
    RightCheek,
    LeftEar,
    RightEar,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmark {
    pub kind: LandmarkKind,
    pub position: [f32; 2],
}
