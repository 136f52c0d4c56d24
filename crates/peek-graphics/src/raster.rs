// peek-graphics/src/raster.rs
//
// `Surface` over an RGBA image buffer, for headless previews and snapshots.
// imageproc walks every pixel of a primitive before clipping, so shapes are
// clipped here first: non-finite coordinates are dropped and anything far
// off the buffer is pulled in to just past its border.

use crate::Result;
use image::{Rgba, RgbaImage};
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut},
    rect::Rect,
};
use log::trace;
use peek_overlay::{Color, Point, RectF, Surface};
use std::path::Path;

const MAX_STROKE: i32 = 64;

pub struct ImageSurface {
    image: RgbaImage,
    skipped_text: usize,
}

impl ImageSurface {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height), skipped_text: 0 }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Text runs dropped because no font is loaded.
    pub fn skipped_text(&self) -> usize {
        self.skipped_text
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save(path.as_ref())?;
        Ok(())
    }

    fn size(&self) -> (f32, f32) {
        (self.image.width() as f32, self.image.height() as f32)
    }
}

fn px(color: Color) -> Rgba<u8> {
    Rgba(color.0)
}

// stroke widths are approximated by repeated 1px primitives
fn passes(stroke_width: f32) -> i32 {
    (stroke_width.round() as i32).clamp(1, MAX_STROKE)
}

fn finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Liang–Barsky clip of a segment against `[min, max]`. Runs in f64 so far
/// endpoints don't swallow the margin.
fn clip_segment(from: Point, to: Point, min: (f32, f32), max: (f32, f32)) -> Option<(Point, Point)> {
    let (x0, y0) = (from.x as f64, from.y as f64);
    let (dx, dy) = (to.x as f64 - x0, to.y as f64 - y0);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    let edges = [
        (-dx, x0 - min.0 as f64),
        (dx, max.0 as f64 - x0),
        (-dy, y0 - min.1 as f64),
        (dy, max.1 as f64 - y0),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else if r < t0 {
            return None;
        } else {
            t1 = t1.min(r);
        }
    }
    let at = |t: f64| Point::new((x0 + t * dx) as f32, (y0 + t * dy) as f32);
    Some((at(t0), at(t1)))
}

impl Surface for ImageSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn draw_rect(&mut self, rect: RectF, color: Color, stroke_width: f32) {
        if !finite(&[rect.left, rect.top, rect.right, rect.bottom]) {
            trace!("skipping non-finite rect {:?}", rect);
            return;
        }
        let rect = rect.normalized();
        let (w, h) = self.size();
        if rect.right < 0.0 || rect.bottom < 0.0 || rect.left > w || rect.top > h {
            return;
        }

        let n = passes(stroke_width);
        // far edges land just outside the buffer, so their strokes stay invisible
        let margin = n as f32 + 1.0;
        let left = rect.left.max(-margin);
        let top = rect.top.max(-margin);
        let right = rect.right.min(w + margin);
        let bottom = rect.bottom.min(h + margin);

        for inset in 0..n {
            let rw = (right - left).round() as i32 - 2 * inset;
            let rh = (bottom - top).round() as i32 - 2 * inset;
            if rw <= 0 || rh <= 0 {
                break;
            }
            let r = Rect::at(left.round() as i32 + inset, top.round() as i32 + inset).of_size(rw as u32, rh as u32);
            draw_hollow_rect_mut(&mut self.image, r, px(color));
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, stroke_width: f32) {
        if !finite(&[from.x, from.y, to.x, to.y]) {
            trace!("skipping non-finite line {:?} -> {:?}", from, to);
            return;
        }
        let n = passes(stroke_width);
        let (w, h) = self.size();
        let margin = n as f32 + 1.0;
        let Some((from, to)) = clip_segment(from, to, (-margin, -margin), (w + margin, h + margin)) else {
            return;
        };

        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let len = (dx * dx + dy * dy).sqrt();
        // unit normal, used to fan out parallel 1px segments
        let (nx, ny) = if len > 0.0 { (-dy / len, dx / len) } else { (0.0, 0.0) };

        for i in 0..n {
            let off = i as f32 - (n - 1) as f32 / 2.0;
            draw_line_segment_mut(
                &mut self.image,
                (from.x + nx * off, from.y + ny * off),
                (to.x + nx * off, to.y + ny * off),
                px(color),
            );
        }
    }

    fn draw_circle(&mut self, center: Point, radius: f32, color: Color, filled: bool) {
        if !finite(&[center.x, center.y, radius]) {
            trace!("skipping non-finite circle at {:?}", center);
            return;
        }
        let (w, h) = self.size();
        let radius = radius.max(1.0);

        let near = (center.x - center.x.clamp(0.0, w)).hypot(center.y - center.y.clamp(0.0, h));
        if near > radius + 1.0 {
            return;
        }
        let far_x = if center.x < w / 2.0 { w - center.x } else { center.x };
        let far_y = if center.y < h / 2.0 { h - center.y } else { center.y };
        let far = far_x.hypot(far_y);
        if radius > far + 1.0 {
            // the buffer lies entirely inside the circle
            if filled {
                for p in self.image.pixels_mut() {
                    *p = px(color);
                }
            }
            return;
        }
        // an arc this large crossing the buffer is effectively a straight edge
        if radius > 2.0 * (w + h) + 64.0 {
            trace!("skipping circle of radius {:.0} at {:?}", radius, center);
            return;
        }

        let c = (center.x.round() as i32, center.y.round() as i32);
        let r = radius.round() as i32;
        if filled {
            draw_filled_circle_mut(&mut self.image, c, r, px(color));
        } else {
            draw_hollow_circle_mut(&mut self.image, c, r, px(color));
        }
    }

    fn draw_text(&mut self, origin: Point, text: &str, _color: Color, _size: f32) {
        self.skipped_text += 1;
        trace!("no font loaded, skipping text {:?} at ({:.0}, {:.0})", text, origin.x, origin.y);
    }
}
