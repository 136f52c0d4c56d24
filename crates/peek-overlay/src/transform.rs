//! Image-space → view-space transform.
//!
//! The overlay keeps a [`TransformCache`] next to its graphics. Any change of
//! image source or view size flips it to `Stale`; the next render recomputes
//! it with [`Transform::compute`]. Until both sizes are known the cache stays
//! stale and the render pass is skipped.

use crate::geometry::{Affine, Point, RectF};
use crate::{OverlayError, Result};

/// Dimensions and orientation of the image the detector ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSource {
    pub width: u32,
    pub height: u32,
    pub flipped: bool,
}

impl ImageSource {
    pub fn new(width: u32, height: u32, flipped: bool) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(OverlayError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height, flipped })
    }

    /// Source info for a sensor frame delivered with a rotation. Frames
    /// rotated by 90 or 270 degrees are upright with width and height swapped.
    pub fn for_rotation(width: u32, height: u32, rotation_degrees: u32, flipped: bool) -> Result<Self> {
        match rotation_degrees {
            0 | 180 => Self::new(width, height, flipped),
            90 | 270 => Self::new(height, width, flipped),
            other => Err(OverlayError::InvalidRotation(other)),
        }
    }
}

/// Current on-screen size of the overlay view, as reported by the host layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewSize {
    pub width: u32,
    pub height: u32,
}

impl ViewSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Uniform scale plus letterbox offsets (plus optional mirror).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale_factor: f32,
    pub width_offset: f32,
    pub height_offset: f32,
    pub flipped: bool,
    pub view_width: f32,
    pub view_height: f32,
}

impl Transform {
    /// Fit the image into the view so that it covers the view completely,
    /// centering the overflow on one axis. Returns `None` when either size is
    /// not known yet.
    pub fn compute(source: ImageSource, view: ViewSize) -> Option<Transform> {
        if source.width == 0 || source.height == 0 || view.is_empty() {
            return None;
        }

        let view_width = view.width as f32;
        let view_height = view.height as f32;
        let image_width = source.width as f32;
        let image_height = source.height as f32;

        let view_aspect = view_width / view_height;
        let image_aspect = image_width / image_height;

        let (scale_factor, width_offset, height_offset) = if view_aspect > image_aspect {
            // view is wider: fit width, overflow vertically
            (view_width / image_width, 0.0, (view_width / image_aspect - view_height) / 2.0)
        } else {
            (view_height / image_height, (view_height * image_aspect - view_width) / 2.0, 0.0)
        };

        Some(Transform {
            scale_factor,
            width_offset,
            height_offset,
            flipped: source.flipped,
            view_width,
            view_height,
        })
    }

    pub fn scale(&self, value: f32) -> f32 {
        value * self.scale_factor
    }

    pub fn translate_x(&self, x: f32) -> f32 {
        let projected = self.scale(x) - self.width_offset;
        if self.flipped {
            self.view_width - projected
        } else {
            projected
        }
    }

    pub fn translate_y(&self, y: f32) -> f32 {
        self.scale(y) - self.height_offset
    }

    pub fn translate_point(&self, p: Point) -> Point {
        Point::new(self.translate_x(p.x), self.translate_y(p.y))
    }

    /// Map a rectangle and re-order its edges, since mirroring swaps left and right.
    pub fn translate_rect(&self, rect: RectF) -> RectF {
        RectF::new(
            self.translate_x(rect.left),
            self.translate_y(rect.top),
            self.translate_x(rect.right),
            self.translate_y(rect.bottom),
        )
        .normalized()
    }

    /// Matrix form: scale, then translate by the negative offsets, then mirror
    /// about the view's vertical centerline when flipped.
    pub fn matrix(&self) -> Affine {
        let m = Affine::scale(self.scale_factor, self.scale_factor)
            .then(&Affine::translate(-self.width_offset, -self.height_offset));
        if self.flipped {
            m.then(&Affine::mirror_x(self.view_width / 2.0))
        } else {
            m
        }
    }
}

/// Cached derived transform with explicit invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TransformCache {
    #[default]
    Stale,
    Fresh(Transform),
}

impl TransformCache {
    pub fn invalidate(&mut self) {
        *self = TransformCache::Stale;
    }

    pub fn get(&self) -> Option<Transform> {
        match self {
            TransformCache::Fresh(t) => Some(*t),
            TransformCache::Stale => None,
        }
    }
}
