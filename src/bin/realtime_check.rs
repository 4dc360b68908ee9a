//! realtime_check - live connector check loop
//!
//! Blocking capture→detect→classify→annotate loop over a camera source. Each
//! frame gets per-detection overlay lines and one aggregate banner; the loop
//! cancels cooperatively on SIGINT or after an optional `--seconds` limit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};

use cable_sentinel::config::SentinelConfig;
use cable_sentinel::ingest::CameraSource;
use cable_sentinel::{
    BackendRegistry, ConfidencePolicy, DetectionCapability, DetectionPolicy, FrameVerdict,
    StubBackend, Taxonomy, TaxonomyPolicy,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyChoice {
    /// Nominal iff confidence clears the alert threshold (live default).
    Confidence,
    /// Connected/disconnected semantics from the class taxonomy.
    Taxonomy,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Camera device URI (stub:// sources are built in).
    #[arg(long)]
    camera: Option<String>,
    /// Frames per second for the capture loop.
    #[arg(long)]
    fps: Option<u32>,
    /// Stop after this many seconds (0 = run until interrupted).
    #[arg(long, default_value_t = 0)]
    seconds: u64,
    /// Alert confidence threshold for the confidence policy (0..1).
    #[arg(long)]
    alert_threshold: Option<f32>,
    /// State-evaluation policy applied to each detection.
    #[arg(long, value_enum, default_value = "confidence")]
    policy: PolicyChoice,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut cfg = SentinelConfig::load()?;
    if let Some(camera) = args.camera {
        cfg.camera.device = camera;
    }
    if let Some(fps) = args.fps {
        if fps == 0 {
            return Err(anyhow!("--fps must be >= 1"));
        }
        cfg.camera.target_fps = fps;
    }
    let alert_threshold = args.alert_threshold.unwrap_or(cfg.alert_threshold);
    if !(0.0..=1.0).contains(&alert_threshold) {
        return Err(anyhow!("--alert-threshold must be within 0..=1"));
    }

    let taxonomy = Taxonomy::standard();
    let policy: Box<dyn DetectionPolicy> = match args.policy {
        PolicyChoice::Confidence => Box::new(ConfidencePolicy::new(alert_threshold)),
        PolicyChoice::Taxonomy => Box::new(TaxonomyPolicy::new(taxonomy.clone())),
    };

    let mut registry = BackendRegistry::new();
    registry.register(StubBackend::new());

    let mut source = CameraSource::new(cfg.camera.clone())?;
    source.connect()?;

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

    log::info!(
        "live check started (policy '{}', alert threshold {})",
        policy.name(),
        alert_threshold
    );

    let frame_interval = Duration::from_millis(1000 / u64::from(cfg.camera.target_fps));
    let started = Instant::now();
    let mut abnormal_frames = 0u64;

    while running.load(Ordering::SeqCst) {
        if args.seconds > 0 && started.elapsed().as_secs() >= args.seconds {
            break;
        }

        let frame = source.next_frame()?;
        let detections = registry.detect_with_capability(
            DetectionCapability::ConnectorDetection,
            &frame.pixels,
            frame.width,
            frame.height,
        )?;

        let verdict = FrameVerdict::evaluate(&detections, policy.as_ref(), &taxonomy);
        if !verdict.all_normal {
            abnormal_frames += 1;
        }

        println!("[{}] {}", frame.reference(), verdict.banner());
        for assessed in &verdict.assessments {
            println!("  {}", assessed.overlay_line());
        }

        std::thread::sleep(frame_interval);
    }

    let stats = source.stats();
    println!("live check summary:");
    println!("  device:          {}", stats.device);
    println!("  frames captured: {}", stats.frames_captured);
    println!("  abnormal frames: {}", abnormal_frames);

    Ok(())
}
