use peek_overlay::{Color, Graphic, Point, Projection, Surface};

/// Text pinned to a view-space position; not affected by the transform.
#[derive(Debug, Clone)]
pub struct LabelGraphic {
    lines: Vec<String>,
    origin: Point,
    color: Color,
    size: f32,
}

impl LabelGraphic {
    pub fn new(origin: Point, text: impl Into<String>) -> Self {
        Self { lines: vec![text.into()], origin, color: Color::GREEN, size: 24.0 }
    }

    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }
}

impl Graphic for LabelGraphic {
    fn draw(&self, surface: &mut dyn Surface, _: &Projection<'_>) {
        let mut y = self.origin.y;
        for line in &self.lines {
            surface.draw_text(Point::new(self.origin.x, y), line, self.color, self.size);
            y += self.size * 1.25;
        }
    }
}
