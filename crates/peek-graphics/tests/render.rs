use peek_graphics::{BoxGraphic, Detection, Face, FaceGraphic, ImageSurface, LabelGraphic};
use peek_overlay::{DrawOp, Overlay, Point, RecordingSurface, RectF, RenderStatus};

fn person(bbox: [f32; 4]) -> Detection {
    Detection { bbox, score: 0.9, class: 0, label: Some("person".into()) }
}

#[test]
fn box_is_projected_into_view() {
    let overlay = Overlay::new();
    overlay.set_image_source_info(320, 240, false).unwrap();
    overlay.on_layout(640, 480);
    overlay.add(BoxGraphic::new(person([10.0, 20.0, 110.0, 120.0])));

    let mut surface = RecordingSurface::new(640, 480);
    assert_eq!(overlay.render(&mut surface), RenderStatus::Drawn { graphics: 1 });

    match &surface.ops()[0] {
        DrawOp::Rect { rect, .. } => {
            assert!((rect.left - 20.0).abs() < 1e-3);
            assert!((rect.top - 40.0).abs() < 1e-3);
            assert!((rect.right - 220.0).abs() < 1e-3);
            assert!((rect.bottom - 240.0).abs() < 1e-3);
        }
        other => panic!("expected rect, got {other:?}"),
    }
    match &surface.ops()[1] {
        DrawOp::Text { text, .. } => assert_eq!(text, "person 0.90"),
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn mirrored_box_stays_well_formed() {
    let overlay = Overlay::new();
    overlay.set_image_source_info(500, 250, true).unwrap();
    overlay.on_layout(1000, 400);
    overlay.add(BoxGraphic::new(person([100.0, 50.0, 200.0, 100.0])).show_label(false));

    let mut surface = RecordingSurface::new(1000, 400);
    overlay.render(&mut surface);

    assert_eq!(surface.ops().len(), 1);
    let DrawOp::Rect { rect, .. } = &surface.ops()[0] else {
        panic!("expected rect");
    };
    assert!((rect.left - 600.0).abs() < 1e-3);
    assert!((rect.right - 800.0).abs() < 1e-3);
}

#[test]
fn face_draws_center_box_and_text() {
    let face: Face = serde_json::from_str(
        r#"{
            "bbox": [100, 100, 200, 220],
            "tracking_id": 4,
            "landmarks": [{ "kind": "nose_base", "position": [150, 160] }],
            "contour": [[110, 120], [190, 120]],
            "smiling_probability": 0.25
        }"#,
    )
    .unwrap();

    let overlay = Overlay::new();
    overlay.set_image_source_info(400, 400, false).unwrap();
    overlay.on_layout(400, 400);
    overlay.add(FaceGraphic::new(face));

    let mut surface = RecordingSurface::new(400, 400);
    overlay.render(&mut surface);

    let ops = surface.ops();
    assert!(matches!(ops[0], DrawOp::Circle { center, filled: true, .. } if center == Point::new(150.0, 160.0)));
    assert!(matches!(ops[1], DrawOp::Rect { rect, .. } if rect == RectF::new(100.0, 100.0, 200.0, 220.0)));
    let circles = ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. })).count();
    assert_eq!(circles, 1 + 2 + 1);
    let texts: Vec<_> = ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["ID: 4", "Happiness: 0.25"]);
}

#[test]
fn labels_ignore_the_transform() {
    let overlay = Overlay::new();
    overlay.set_image_source_info(10, 10, true).unwrap();
    overlay.on_layout(1000, 1000);
    overlay.add(LabelGraphic::new(Point::new(5.0, 30.0), "fps 30").line("faces 2").with_size(20.0));

    let mut surface = RecordingSurface::new(1000, 1000);
    overlay.render(&mut surface);
    assert_eq!(
        surface.ops()[1],
        DrawOp::Text { origin: Point::new(5.0, 55.0), text: "faces 2".into(), color: peek_overlay::Color::GREEN, size: 20.0 }
    );
}

#[test]
fn snapshot_png_roundtrips_through_disk() -> anyhow::Result<()> {
    let overlay = Overlay::new();
    overlay.set_image_source_info(64, 48, false)?;
    overlay.on_layout(128, 96);
    overlay.add(BoxGraphic::new(person([4.0, 4.0, 30.0, 30.0])));

    let mut surface = ImageSurface::new(128, 96);
    overlay.render(&mut surface);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("overlay.png");
    surface.save(&path)?;

    let loaded = image::open(&path)?.to_rgba8();
    assert_eq!(loaded.dimensions(), (128, 96));
    assert_eq!(loaded.get_pixel(8, 8).0, peek_overlay::Color::palette(0).0);
    Ok(())
}

#[test]
fn out_of_range_boxes_render_without_panicking() {
    let overlay = Overlay::new();
    overlay.set_image_source_info(320, 240, false).unwrap();
    overlay.on_layout(640, 480);
    overlay.add(BoxGraphic::new(person([10.0, 10.0, f32::MAX, 20.0])));
    overlay.add(BoxGraphic::new(person([10.0, 30.0, 1.0e12, 40.0])));

    let mut surface = ImageSurface::new(640, 480);
    assert_eq!(overlay.render(&mut surface), RenderStatus::Drawn { graphics: 2 });

    // the finite box keeps its left edge; both labels were attempted
    assert_ne!(surface.image().get_pixel(20, 70).0[3], 0);
    assert_eq!(surface.skipped_text(), 2);
}
