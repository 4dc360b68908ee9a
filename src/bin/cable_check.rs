//! cable_check - batch connector check over a directory of images
//!
//! For each image: decode, run the detector backend, interpret the raw
//! detections into a per-connector status map, print the console report, and
//! accumulate the session. The session is serialized as a JSON array on
//! request.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use cable_sentinel::config::SentinelConfig;
use cable_sentinel::dataset::{find_images, is_image_path};
use cable_sentinel::{
    interpret, BackendRegistry, Detection, DetectionCapability, Report, Session, StubBackend,
    Taxonomy,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image file or directory to scan.
    #[arg(long)]
    source: PathBuf,
    /// Detection confidence floor (0..1); detections below it are dropped.
    #[arg(long)]
    conf_thres: Option<f32>,
    /// Detector backend name.
    #[arg(long)]
    backend: Option<String>,
    /// Write the accumulated session report JSON at exit.
    #[arg(long)]
    save_report: bool,
    /// Session report output path.
    #[arg(long)]
    report_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = SentinelConfig::load()?;
    let conf_thres = args.conf_thres.unwrap_or(cfg.conf_threshold);
    let backend_name = args.backend.unwrap_or(cfg.backend);
    let report_out = args.report_out.unwrap_or(cfg.report_out);

    if !(0.0..=1.0).contains(&conf_thres) {
        return Err(anyhow!("--conf-thres must be within 0..=1"));
    }

    let mut registry = BackendRegistry::new();
    registry.register(StubBackend::new());
    registry.set_default(&backend_name)?;

    let taxonomy = Taxonomy::standard();
    let mut session = Session::new();

    let images = collect_images(&args.source)?;
    if images.is_empty() {
        return Err(anyhow!("no image files found under {}", args.source.display()));
    }
    log::info!(
        "checking {} images with backend '{}' (conf >= {})",
        images.len(),
        backend_name,
        conf_thres
    );

    let mut alerts_total = 0usize;
    let mut failures = 0usize;
    for path in &images {
        let detections = match detect_image(&registry, path) {
            Ok(detections) => detections,
            Err(err) => {
                log::warn!("skipping {}: {:#}", path.display(), err);
                failures += 1;
                continue;
            }
        };
        let detections: Vec<_> = detections
            .into_iter()
            .filter(|det| det.confidence >= conf_thres)
            .collect();

        let report = Report::new(path.display().to_string(), interpret(&detections, &taxonomy));
        report.print_console();
        alerts_total += report.alerts.len();
        session.record(report);
    }

    if args.save_report {
        session.save_json(&report_out)?;
        log::info!("session report saved to {}", report_out.display());
    }

    println!("check summary:");
    println!("  images processed: {}", session.len());
    println!("  images skipped:   {}", failures);
    println!("  alerts raised:    {}", alerts_total);

    Ok(())
}

fn collect_images(source: &Path) -> Result<Vec<PathBuf>> {
    if source.is_file() {
        if !is_image_path(source) {
            return Err(anyhow!("{} is not a supported image file", source.display()));
        }
        return Ok(vec![source.to_path_buf()]);
    }
    Ok(find_images(source))
}

fn detect_image(registry: &BackendRegistry, path: &Path) -> Result<Vec<Detection>> {
    let img = image::open(path)
        .with_context(|| format!("decoding {}", path.display()))?
        .to_rgb8();
    registry.detect_with_capability(
        DetectionCapability::ConnectorDetection,
        img.as_raw(),
        img.width(),
        img.height(),
    )
}
