//! Drawing target handed to the overlay once per frame.

use crate::geometry::{Point, RectF};

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const RED: Color = Color([255, 0, 0, 255]);
    pub const GREEN: Color = Color([0, 255, 0, 255]);
    pub const BLUE: Color = Color([0, 0, 255, 255]);
    pub const YELLOW: Color = Color([255, 255, 0, 255]);
    pub const CYAN: Color = Color([0, 255, 255, 255]);
    pub const MAGENTA: Color = Color([255, 0, 255, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b, 255])
    }

    /// Pick a colour from a small fixed palette, cycling by `index`.
    pub fn palette(index: usize) -> Self {
        const PALETTE: [Color; 7] = [
            Color::BLUE,
            Color::CYAN,
            Color::GREEN,
            Color::MAGENTA,
            Color::RED,
            Color::WHITE,
            Color::YELLOW,
        ];
        PALETTE[index % PALETTE.len()]
    }
}

/// Something the overlay can draw on: a canvas, an image buffer, a recorder.
///
/// Coordinates are view-space pixels.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn draw_rect(&mut self, rect: RectF, color: Color, stroke_width: f32);
    fn draw_line(&mut self, from: Point, to: Point, color: Color, stroke_width: f32);
    fn draw_circle(&mut self, center: Point, radius: f32, color: Color, filled: bool);

    /// Text is optional; surfaces without a font ignore it.
    fn draw_text(&mut self, _origin: Point, _text: &str, _color: Color, _size: f32) {}
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect { rect: RectF, color: Color, stroke_width: f32 },
    Line { from: Point, to: Point, color: Color, stroke_width: f32 },
    Circle { center: Point, radius: f32, color: Color, filled: bool },
    Text { origin: Point, text: String, color: Color, size: f32 },
}

/// Surface that just records what was drawn. Used by headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ops: Vec::new() }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_rect(&mut self, rect: RectF, color: Color, stroke_width: f32) {
        self.ops.push(DrawOp::Rect { rect, color, stroke_width });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, stroke_width: f32) {
        self.ops.push(DrawOp::Line { from, to, color, stroke_width });
    }

    fn draw_circle(&mut self, center: Point, radius: f32, color: Color, filled: bool) {
        self.ops.push(DrawOp::Circle { center, radius, color, filled });
    }

    fn draw_text(&mut self, origin: Point, text: &str, color: Color, size: f32) {
        self.ops.push(DrawOp::Text { origin, text: text.to_owned(), color, size });
    }
}
