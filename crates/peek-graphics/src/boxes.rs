use crate::Detection;
use peek_overlay::{Color, Graphic, Point, Projection, RectF, Surface};

const STROKE_WIDTH: f32 = 4.0;
const TEXT_SIZE: f32 = 24.0;

/// Outline of one detection, optionally labelled `"<name> <score>"`.
#[derive(Debug, Clone)]
pub struct BoxGraphic {
    detection: Detection,
    color: Color,
    show_label: bool,
}

impl BoxGraphic {
    pub fn new(detection: Detection) -> Self {
        let color = Color::palette(detection.class);
        Self { detection, color, show_label: true }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn show_label(mut self, show: bool) -> Self {
        self.show_label = show;
        self
    }

    pub fn detection(&self) -> &Detection {
        &self.detection
    }

    pub fn label_text(&self) -> String {
        match &self.detection.label {
            Some(name) => format!("{} {:.2}", name, self.detection.score),
            None => format!("c{} {:.2}", self.detection.class, self.detection.score),
        }
    }
}

impl Graphic for BoxGraphic {
    fn draw(&self, surface: &mut dyn Surface, projection: &Projection<'_>) {
        let rect = projection.translate_rect(RectF::from_corners(self.detection.bbox));
        surface.draw_rect(rect, self.color, STROKE_WIDTH);

        if self.show_label {
            let origin = Point::new(rect.left, rect.top - 5.0);
            surface.draw_text(origin, &self.label_text(), self.color, TEXT_SIZE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(label: Option<&str>) -> Detection {
        Detection { bbox: [0.0, 0.0, 10.0, 10.0], score: 0.876, class: 3, label: label.map(str::to_owned) }
    }

    #[test]
    fn label_prefers_name() {
        assert_eq!(BoxGraphic::new(det(Some("person"))).label_text(), "person 0.88");
        assert_eq!(BoxGraphic::new(det(None)).label_text(), "c3 0.88");
    }

    #[test]
    fn color_follows_class_unless_overridden() {
        assert_eq!(BoxGraphic::new(det(None)).color, Color::palette(3));
        assert_eq!(BoxGraphic::new(det(None)).with_color(Color::RED).color, Color::RED);
    }
}
