// peek-overlay/src/lib.rs
// ============================================================
// Annotation overlay for a live camera preview
// Keeps the list of drawable graphics produced by the vision
// pipeline and the transform that maps detector (image pixel)
// coordinates onto the preview view.
// ------------------------------------------------------------
// Public API:
//   * Overlay::set_image_source_info() – image size + mirroring
//   * Overlay::on_layout()             – host reports view size
//   * Overlay::add/remove/clear()      – mutate the graphic list
//   * Overlay::render()                – once per display frame
// ------------------------------------------------------------
// Threading
//   * One mutex guards graphics *and* transform, so a render
//     never observes a half-updated list.
// ============================================================

//! peek – overlay layer
//!
//! Producers (usually result callbacks of the processing pipeline) push
//! [`Graphic`]s into an [`Overlay`]; the host UI calls [`Overlay::render`]
//! once per frame with a [`Surface`]. Graphics never hold a reference to the
//! overlay. Instead each draw call receives a [`Projection`], a read-only
//! view of the current transform, so positions are resolved at draw time.

use log::{debug, trace};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub mod geometry;
pub mod surface;
pub mod transform;

pub use geometry::{Affine, Point, RectF};
pub use surface::{Color, DrawOp, RecordingSurface, Surface};
pub use transform::{ImageSource, Transform, TransformCache, ViewSize};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    #[error("image dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("unsupported frame rotation: {0} degrees")]
    InvalidRotation(u32),
}

pub type Result<T> = std::result::Result<T, OverlayError>;

/// A drawable annotation (box, landmark, label…) positioned in image space.
pub trait Graphic: Send {
    fn draw(&self, surface: &mut dyn Surface, projection: &Projection<'_>);
}

/// Read-only access to the overlay's transform during a render pass.
#[derive(Debug, Clone, Copy)]
pub struct Projection<'a> {
    transform: &'a Transform,
    source: &'a ImageSource,
}

impl<'a> Projection<'a> {
    /// Image-space length → view-space length.
    pub fn scale(&self, image_pixels: f32) -> f32 {
        self.transform.scale(image_pixels)
    }

    pub fn translate_x(&self, x: f32) -> f32 {
        self.transform.translate_x(x)
    }

    pub fn translate_y(&self, y: f32) -> f32 {
        self.transform.translate_y(y)
    }

    pub fn translate_point(&self, p: Point) -> Point {
        self.transform.translate_point(p)
    }

    pub fn translate_rect(&self, rect: RectF) -> RectF {
        self.transform.translate_rect(rect)
    }

    pub fn is_image_flipped(&self) -> bool {
        self.source.flipped
    }

    pub fn image_width(&self) -> u32 {
        self.source.width
    }

    pub fn image_height(&self) -> u32 {
        self.source.height
    }

    pub fn matrix(&self) -> Affine {
        self.transform.matrix()
    }

    pub fn transform(&self) -> &'a Transform {
        self.transform
    }
}

/// Host callback asking for another frame ("invalidate").
pub trait RedrawHook: Send + Sync {
    fn request_redraw(&self);
}

impl<F> RedrawHook for F
where
    F: Fn() + Send + Sync,
{
    fn request_redraw(&self) {
        self()
    }
}

/// Handle returned by [`Overlay::add`], used to remove that graphic again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphicId(u64);

/// Outcome of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Drawn { graphics: usize },
    /// Image source or view size not known yet; nothing was drawn.
    NotReady,
}

#[derive(Default)]
struct State {
    source: Option<ImageSource>,
    view: ViewSize,
    cache: TransformCache,
    revision: u64,
    next_id: u64,
    graphics: Vec<(GraphicId, Box<dyn Graphic>)>,
}

impl State {
    fn refresh_transform(&mut self) -> Option<Transform> {
        if let TransformCache::Fresh(t) = self.cache {
            return Some(t);
        }
        let transform = Transform::compute(self.source?, self.view)?;
        self.cache = TransformCache::Fresh(transform);
        self.revision += 1;
        debug!(
            "overlay transform #{}: scale {:.4}, offsets ({:.1}, {:.1}), flipped {}",
            self.revision,
            transform.scale_factor,
            transform.width_offset,
            transform.height_offset,
            transform.flipped
        );
        Some(transform)
    }
}

/// Thread-safe graphic list plus cached image→view transform.
///
/// Share it as `Arc<Overlay>` between the render thread and producers.
pub struct Overlay {
    state: Mutex<State>,
    redraw: Option<Box<dyn RedrawHook>>,
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Overlay")
            .field("source", &state.source)
            .field("view", &state.view)
            .field("cache", &state.cache)
            .field("graphics", &state.graphics.len())
            .finish()
    }
}

impl Overlay {
    /// Overlay without a host; redraw requests are dropped.
    pub fn new() -> Self {
        Self { state: Mutex::new(State::default()), redraw: None }
    }

    /// Overlay that forwards redraw requests to the host.
    pub fn with_redraw(hook: impl RedrawHook + 'static) -> Self {
        Self { state: Mutex::new(State::default()), redraw: Some(Box::new(hook)) }
    }

    // A panicking graphic poisons the mutex mid-render; the list itself is
    // still consistent, so keep going with it.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the size of the image detections refer to, and whether it must be
    /// mirrored (front camera). Zero dimensions are rejected without touching
    /// the current state.
    pub fn set_image_source_info(&self, width: u32, height: u32, flipped: bool) -> Result<()> {
        let source = ImageSource::new(width, height, flipped)?;
        self.apply_source(source);
        Ok(())
    }

    /// Like [`set_image_source_info`](Self::set_image_source_info) for a raw
    /// sensor frame: width and height are swapped for 90/270 degree rotation.
    pub fn configure_for_frame(&self, width: u32, height: u32, rotation_degrees: u32, flipped: bool) -> Result<()> {
        let source = ImageSource::for_rotation(width, height, rotation_degrees, flipped)?;
        self.apply_source(source);
        Ok(())
    }

    fn apply_source(&self, source: ImageSource) {
        {
            let mut state = self.lock();
            state.source = Some(source);
            state.cache.invalidate();
        }
        debug!("overlay image source {}x{} (flipped: {})", source.width, source.height, source.flipped);
        self.request_redraw();
    }

    /// Host layout callback: the view now occupies `width`×`height` pixels.
    pub fn on_layout(&self, width: u32, height: u32) {
        let mut state = self.lock();
        state.view = ViewSize::new(width, height);
        state.cache.invalidate();
        trace!("overlay layout {}x{}", width, height);
    }

    /// Append a graphic. Does not request a redraw; callers batch-add and then
    /// call [`request_redraw`](Self::request_redraw) once.
    pub fn add(&self, graphic: impl Graphic + 'static) -> GraphicId {
        self.add_boxed(Box::new(graphic))
    }

    pub fn add_boxed(&self, graphic: Box<dyn Graphic>) -> GraphicId {
        let mut state = self.lock();
        let id = GraphicId(state.next_id);
        state.next_id += 1;
        state.graphics.push((id, graphic));
        id
    }

    pub fn remove(&self, id: GraphicId) -> Option<Box<dyn Graphic>> {
        let removed = {
            let mut state = self.lock();
            state
                .graphics
                .iter()
                .position(|(gid, _)| *gid == id)
                .map(|idx| state.graphics.remove(idx).1)
        };
        self.request_redraw();
        removed
    }

    pub fn clear(&self) {
        self.lock().graphics.clear();
        self.request_redraw();
    }

    pub fn len(&self) -> usize {
        self.lock().graphics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().graphics.is_empty()
    }

    pub fn request_redraw(&self) {
        if let Some(hook) = &self.redraw {
            hook.request_redraw();
        }
    }

    /// Draw every graphic in insertion order. Holds the overlay lock for the
    /// whole pass, so producers wait until the frame is done.
    pub fn render(&self, surface: &mut dyn Surface) -> RenderStatus {
        let mut guard = self.lock();
        let state = &mut *guard;

        let Some(transform) = state.refresh_transform() else {
            trace!("overlay not ready, skipping render");
            return RenderStatus::NotReady;
        };
        let Some(source) = state.source.as_ref() else {
            return RenderStatus::NotReady;
        };

        let projection = Projection { transform: &transform, source };
        for (_, graphic) in &state.graphics {
            graphic.draw(surface, &projection);
        }
        RenderStatus::Drawn { graphics: state.graphics.len() }
    }

    /// The cached transform, if it is currently fresh. Never recomputes.
    pub fn transform(&self) -> Option<Transform> {
        self.lock().cache.get()
    }

    /// How many times the transform has been recomputed.
    pub fn transform_revision(&self) -> u64 {
        self.lock().revision
    }

    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.lock().source.map(|s| (s.width, s.height))
    }

    pub fn is_image_flipped(&self) -> bool {
        self.lock().source.map_or(false, |s| s.flipped)
    }

    pub fn view_size(&self) -> ViewSize {
        self.lock().view
    }
}
