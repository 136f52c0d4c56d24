use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which camera the frames come from. Front camera previews are mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LensFacing {
    #[default]
    Front,
    Back,
}

impl LensFacing {
    pub fn is_mirrored(self) -> bool {
        matches!(self, LensFacing::Front)
    }
}

/// Settings for a processing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Detections scoring below this are not drawn
    pub min_score: f32,
    /// Draw class/score labels next to boxes
    pub show_labels: bool,
    /// Detection worker threads; `None` means one per core minus one
    pub worker_threads: Option<usize>,
    pub lens_facing: LensFacing,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            min_score: 0.5,
            show_labels: true,
            worker_threads: None,
            lens_facing: LensFacing::Front,
        }
    }
}

impl ProcessorConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: ProcessorConfig = serde_json::from_str(r#"{ "min_score": 0.25, "lens_facing": "back" }"#).unwrap();
        assert_eq!(cfg.min_score, 0.25);
        assert_eq!(cfg.lens_facing, LensFacing::Back);
        assert!(cfg.show_labels);
        assert_eq!(cfg.worker_threads, None);
    }
}
