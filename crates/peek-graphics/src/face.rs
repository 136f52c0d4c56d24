use crate::Face;
use peek_overlay::{Color, Graphic, Point, Projection, RectF, Surface};

const FACE_POSITION_RADIUS: f32 = 8.0;
const LANDMARK_RADIUS: f32 = 6.0;
const CONTOUR_RADIUS: f32 = 3.0;
const ID_TEXT_SIZE: f32 = 30.0;
const BOX_STROKE_WIDTH: f32 = 5.0;
const LINE_SPACING: f32 = ID_TEXT_SIZE * 1.2;

/// Face box with its centre, landmarks, contour points and a text block
/// (tracking id, smile and eye-open probabilities) above the box.
#[derive(Debug, Clone)]
pub struct FaceGraphic {
    face: Face,
    color: Color,
}

impl FaceGraphic {
    pub fn new(face: Face) -> Self {
        // stable colour per tracked face
        let color = Color::palette(face.tracking_id.unwrap_or(0) as usize);
        Self { face, color }
    }

    pub fn face(&self) -> &Face {
        &self.face
    }

    pub fn text_lines(&self) -> Vec<String> {
        let f = &self.face;
        let mut lines = Vec::new();
        if let Some(id) = f.tracking_id {
            lines.push(format!("ID: {}", id));
        }
        if let Some(p) = f.smiling_probability {
            lines.push(format!("Happiness: {:.2}", p));
        }
        if let Some(p) = f.left_eye_open_probability {
            lines.push(format!("Left eye open: {:.2}", p));
        }
        if let Some(p) = f.right_eye_open_probability {
            lines.push(format!("Right eye open: {:.2}", p));
        }
        lines
    }
}

impl Graphic for FaceGraphic {
    fn draw(&self, surface: &mut dyn Surface, projection: &Projection<'_>) {
        let bbox = RectF::from_corners(self.face.bbox);
        let rect = projection.translate_rect(bbox);

        surface.draw_circle(projection.translate_point(bbox.center()), FACE_POSITION_RADIUS, self.color, true);
        surface.draw_rect(rect, self.color, BOX_STROKE_WIDTH);

        for point in &self.face.contour {
            let p = projection.translate_point(Point::new(point[0], point[1]));
            surface.draw_circle(p, CONTOUR_RADIUS, self.color, true);
        }
        for landmark in &self.face.landmarks {
            let [x, y] = landmark.position;
            surface.draw_circle(projection.translate_point(Point::new(x, y)), LANDMARK_RADIUS, self.color, false);
        }

        let lines = self.text_lines();
        let mut y = rect.top - LINE_SPACING * lines.len() as f32;
        for line in &lines {
            surface.draw_text(Point::new(rect.left, y), line, self.color, ID_TEXT_SIZE);
            y += LINE_SPACING;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lines_only_for_known_values() {
        let face = Face { tracking_id: Some(7), smiling_probability: Some(0.5), ..Face::default() };
        assert_eq!(FaceGraphic::new(face).text_lines(), vec!["ID: 7", "Happiness: 0.50"]);
        assert!(FaceGraphic::new(Face::default()).text_lines().is_empty());
    }
}
