//! Headless overlay demo
//!
//! Replays scripted detections through the whole stack:
//! 1. frames go to a detector running on a worker pool (or tokio)
//! 2. results are posted to a looper standing in for the UI thread
//! 3. the overlay is rendered into an image every frame
//! 4. the processor is stopped and a late result is shown to be dropped
//!
//! Usage: cargo run -p demos --bin overlay_demo -- --detections dets.json --out overlay.png

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use peek_dispatch::{Executor, Looper, WorkerPool};
use peek_graphics::{Detection, ImageSurface};
use peek_overlay::{Overlay, RenderStatus};
use peek_pipeline::{
    Frame, LensFacing, ObjectDetector, ProcessorBase, ProcessorConfig, Scripted, VisionProcessor,
};
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const RESULT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(about = "Render scripted detections through a peek overlay")]
struct Args {
    #[arg(long, default_value = "640")]
    image_width: u32,

    #[arg(long, default_value = "480")]
    image_height: u32,

    #[arg(long, default_value = "1080")]
    view_width: u32,

    #[arg(long, default_value = "1920")]
    view_height: u32,

    /// Sensor rotation of incoming frames (0, 90, 180, 270)
    #[arg(long, default_value = "90")]
    rotation: u32,

    /// Frames come from the back camera (no mirroring)
    #[arg(long)]
    back: bool,

    /// JSON array of per-frame detection arrays; a moving box if omitted
    #[arg(long)]
    detections: Option<PathBuf>,

    /// Processor settings (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "30")]
    frames: usize,

    /// Run detection on the tokio blocking pool instead of worker threads
    #[arg(long)]
    tokio: bool,

    #[arg(long, default_value = "overlay.png")]
    out: PathBuf,
}

/// One box sliding left to right across the image.
fn moving_box(width: u32, height: u32, frames: usize) -> Vec<Vec<Detection>> {
    let (w, h) = (width as f32, height as f32);
    let size = w.min(h) / 4.0;
    (0..frames.max(1))
        .map(|i| {
            let x = (w - size) * i as f32 / frames.max(1) as f32;
            let y = (h - size) / 2.0;
            vec![Detection {
                bbox: [x, y, x + size, y + size],
                score: 0.9,
                class: 0,
                label: Some("person".into()),
            }]
        })
        .collect()
}

/// Byte length of an NV21 frame (full-size luma, quarter-size interleaved chroma).
fn nv21_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(3)
        .map(|n| n / 2)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ProcessorConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ProcessorConfig::default(),
    };
    if args.back {
        config.lens_facing = LensFacing::Back;
    }

    println!("🚀 peek overlay demo");
    println!("====================");
    println!(
        "Image: {}x{} (rotation {}), View: {}x{}, Lens: {:?}",
        args.image_width, args.image_height, args.rotation, args.view_width, args.view_height, config.lens_facing
    );

    let script = match &args.detections {
        Some(path) => Scripted::<Detection>::from_json_file(path)
            .with_context(|| format!("loading detections {}", path.display()))?,
        None => {
            // detections are in upright image coordinates
            let (w, h) = match args.rotation {
                90 | 270 => (args.image_height, args.image_width),
                _ => (args.image_width, args.image_height),
            };
            Scripted::new(moving_box(w, h, args.frames))
        }
    };

    // Host side: a redraw counter and the UI-thread queue
    let redraws = Arc::new(AtomicUsize::new(0));
    let overlay = {
        let redraws = Arc::clone(&redraws);
        Arc::new(Overlay::with_redraw(move || {
            redraws.fetch_add(1, Ordering::Relaxed);
        }))
    };
    overlay.on_layout(args.view_width, args.view_height);
    let looper = Looper::new();

    // keep the runtime alive for as long as the processor uses its handle
    let runtime = if args.tokio { Some(tokio::runtime::Runtime::new()?) } else { None };
    let worker: Arc<dyn Executor> = match &runtime {
        Some(rt) => Arc::new(rt.handle().clone()) as Arc<dyn Executor>,
        None => {
            let pool = match config.worker_threads {
                Some(n) => WorkerPool::new(n)?,
                None => WorkerPool::with_default_threads()?,
            };
            info!("detection on {} worker threads", pool.threads());
            Arc::new(pool) as Arc<dyn Executor>
        }
    };

    let processor = ProcessorBase::new(ObjectDetector::new(script, &config), worker, looper.handle())
        .with_lens_facing(config.lens_facing);

    let frame_len = nv21_len(args.image_width, args.image_height)
        .with_context(|| format!("frame size {}x{} is too large", args.image_width, args.image_height))?;
    let pixels: Arc<[u8]> = vec![0u8; frame_len].into();
    let mut last = ImageSurface::new(args.view_width, args.view_height);
    let started = Instant::now();
    let mut drawn_frames = 0usize;

    for i in 0..args.frames {
        let frame = Frame::new(args.image_width, args.image_height, args.rotation, Arc::clone(&pixels))
            .with_pts(FRAME_INTERVAL * i as u32);
        processor.process(frame, &overlay)?;

        if !looper.run_one(RESULT_TIMEOUT) {
            warn!("frame {}: no result within {:?}", i, RESULT_TIMEOUT);
            continue;
        }

        let mut surface = ImageSurface::new(args.view_width, args.view_height);
        match overlay.render(&mut surface) {
            RenderStatus::Drawn { graphics } => {
                drawn_frames += 1;
                log::debug!("frame {}: {} graphics", i, graphics);
            }
            RenderStatus::NotReady => warn!("frame {}: overlay not ready", i),
        }
        last = surface;
    }

    let elapsed = started.elapsed();
    info!(
        "{} frames rendered in {:.2?} ({:.1} FPS), {} redraw requests",
        drawn_frames,
        elapsed,
        drawn_frames as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        redraws.load(Ordering::Relaxed)
    );

    info!("transform recomputed {} time(s)", overlay.transform_revision());

    last.save(&args.out)
        .with_context(|| format!("saving {}", args.out.display()))?;
    println!("🖼  Saved last frame to {}", args.out.display());
    if last.skipped_text() > 0 {
        println!("   ({} label(s) not rasterised: no font is bundled)", last.skipped_text());
    }

    // A result that is still in flight when the session stops must not land
    let before = overlay.len();
    let frame = Frame::new(args.image_width, args.image_height, args.rotation, Arc::clone(&pixels));
    processor.process(frame, &overlay)?;
    processor.stop();
    let ran = looper.run_for(Duration::from_millis(200));
    println!(
        "🛑 Processor stopped: {} late callback(s) ran as no-ops, overlay still holds {} graphic(s) (was {})",
        ran,
        overlay.len(),
        before
    );

    drop(processor);
    drop(runtime);
    println!("\n🎉 Demo completed!");
    Ok(())
}
