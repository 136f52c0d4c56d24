use peek_overlay::{
    Color, DrawOp, Graphic, Overlay, Point, Projection, RecordingSurface, RenderStatus, Surface,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Barrier, Mutex,
};
use std::thread;

/// Draws a single circle whose red channel carries a tag.
struct Dot(u8);

impl Graphic for Dot {
    fn draw(&self, surface: &mut dyn Surface, p: &Projection<'_>) {
        surface.draw_circle(p.translate_point(Point::new(0.0, 0.0)), 1.0, Color([self.0, 0, 0, 255]), true);
    }
}

fn dot(tag: u8) -> Dot {
    Dot(tag)
}

/// Records the edge mappings it observes during a render pass.
struct EdgeProbe(Arc<Mutex<Vec<(f32, f32, f32, f32)>>>);

impl Graphic for EdgeProbe {
    fn draw(&self, _: &mut dyn Surface, p: &Projection<'_>) {
        let t = p.transform();
        let width = p.image_width() as f32;
        self.0.lock().unwrap().push((
            p.translate_x(0.0),
            -t.width_offset,
            p.translate_x(width),
            p.scale(width) - t.width_offset,
        ));
    }
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn tags(surface: &RecordingSurface) -> Vec<u8> {
    surface
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Circle { color, .. } => Some(color.0[0]),
            _ => None,
        })
        .collect()
}

#[test]
fn concurrent_adds_are_all_rendered() {
    init_logs();
    const THREADS: usize = 8;
    const PER_THREAD: usize = 250;

    let overlay = Arc::new(Overlay::new());
    overlay.set_image_source_info(640, 480, false).unwrap();
    overlay.on_layout(1280, 960);

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let overlay = Arc::clone(&overlay);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..PER_THREAD {
                    overlay.add(dot(1));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let mut surface = RecordingSurface::new(1280, 960);
    assert_eq!(overlay.render(&mut surface), RenderStatus::Drawn { graphics: THREADS * PER_THREAD });
    assert_eq!(surface.ops().len(), THREADS * PER_THREAD);
}

#[test]
fn render_while_producers_mutate() {
    let overlay = Arc::new(Overlay::new());
    overlay.set_image_source_info(100, 100, false).unwrap();
    overlay.on_layout(100, 100);

    let producer = {
        let overlay = Arc::clone(&overlay);
        thread::spawn(move || {
            for i in 0..500u32 {
                overlay.add(dot(2));
                if i % 10 == 0 {
                    overlay.clear();
                }
            }
        })
    };

    let mut surface = RecordingSurface::new(100, 100);
    for _ in 0..200 {
        surface.clear();
        if let RenderStatus::Drawn { graphics } = overlay.render(&mut surface) {
            assert_eq!(graphics, surface.ops().len());
        }
    }
    producer.join().unwrap();
}

#[test]
fn second_render_reuses_transform() -> anyhow::Result<()> {
    init_logs();
    let overlay = Overlay::new();
    overlay.set_image_source_info(640, 480, true)?;
    overlay.on_layout(1080, 2400);

    let mut surface = RecordingSurface::new(1080, 2400);
    overlay.render(&mut surface);
    let first = overlay.transform().expect("fresh after render");
    assert_eq!(overlay.transform_revision(), 1);

    overlay.render(&mut surface);
    assert_eq!(overlay.transform(), Some(first));
    assert_eq!(overlay.transform_revision(), 1);
    Ok(())
}

#[test]
fn source_and_layout_changes_invalidate() {
    let overlay = Overlay::new();
    overlay.set_image_source_info(640, 480, false).unwrap();
    overlay.on_layout(640, 480);
    let mut surface = RecordingSurface::new(640, 480);

    overlay.render(&mut surface);
    assert!(overlay.transform().is_some());

    overlay.on_layout(1280, 480);
    assert!(overlay.transform().is_none());
    overlay.render(&mut surface);
    assert_eq!(overlay.transform_revision(), 2);

    overlay.set_image_source_info(640, 480, true).unwrap();
    assert!(overlay.transform().is_none());
    overlay.render(&mut surface);
    assert_eq!(overlay.transform_revision(), 3);
    assert!(overlay.transform().unwrap().flipped);
}

#[test]
fn unflipped_edges_map_through_offset() {
    let overlay = Overlay::new();
    overlay.set_image_source_info(480, 640, false).unwrap();
    overlay.on_layout(1080, 2400);

    let seen = Arc::new(Mutex::new(Vec::new()));
    overlay.add(EdgeProbe(Arc::clone(&seen)));
    overlay.render(&mut RecordingSurface::new(1080, 2400));

    let seen = seen.lock().unwrap();
    let (x0, expect0, x1, expect1) = seen[0];
    assert_eq!(x0, expect0);
    assert_eq!(x1, expect1);
}

#[test]
fn remove_and_clear_request_redraw_but_add_does_not() {
    let redraws = Arc::new(AtomicUsize::new(0));
    let overlay = {
        let redraws = Arc::clone(&redraws);
        Overlay::with_redraw(move || {
            redraws.fetch_add(1, Ordering::SeqCst);
        })
    };

    let a = overlay.add(dot(1));
    let _b = overlay.add(dot(2));
    assert_eq!(redraws.load(Ordering::SeqCst), 0);

    assert!(overlay.remove(a).is_some());
    assert_eq!(redraws.load(Ordering::SeqCst), 1);
    assert!(overlay.remove(a).is_none());

    overlay.clear();
    assert!(overlay.is_empty());
    assert_eq!(redraws.load(Ordering::SeqCst), 3);

    overlay.set_image_source_info(10, 10, false).unwrap();
    assert_eq!(redraws.load(Ordering::SeqCst), 4);
    assert!(overlay.set_image_source_info(10, 0, false).is_err());
    assert_eq!(redraws.load(Ordering::SeqCst), 4);
}

#[test]
fn graphics_draw_in_insertion_order() {
    let overlay = Overlay::new();
    overlay.set_image_source_info(10, 10, false).unwrap();
    overlay.on_layout(10, 10);

    let _ = overlay.add(dot(1));
    let middle = overlay.add(dot(2));
    let _ = overlay.add(dot(3));
    let _ = overlay.add(dot(4));
    overlay.remove(middle);

    let mut surface = RecordingSurface::new(10, 10);
    overlay.render(&mut surface);
    assert_eq!(tags(&surface), vec![1, 3, 4]);
}
