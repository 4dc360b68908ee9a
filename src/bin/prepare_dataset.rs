//! prepare_dataset - partition raw images into a train/val/test tree
//!
//! Validates the requested ratios before touching the filesystem, then
//! discovers, shuffles, splits, and materializes the dataset, writing a
//! statistics report at the end. Individual file failures are logged and
//! skipped; the batch continues.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use cable_sentinel::dataset::{DatasetPreparer, PrepareOptions, SplitRatios};
use cable_sentinel::ui::Ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Source directory with raw images (searched recursively).
    #[arg(long)]
    source_dir: PathBuf,
    /// Output directory for the partitioned dataset.
    #[arg(long, default_value = "datasets/cable_check")]
    output_dir: PathBuf,
    /// Training set ratio.
    #[arg(long, default_value_t = 0.7)]
    train_ratio: f64,
    /// Validation set ratio.
    #[arg(long, default_value_t = 0.2)]
    val_ratio: f64,
    /// Test set ratio.
    #[arg(long, default_value_t = 0.1)]
    test_ratio: f64,
    /// Letterbox images to this square size (0 copies verbatim).
    #[arg(long, default_value_t = 640)]
    resize: u32,
    /// Verify label files and count per-class box distribution.
    #[arg(long)]
    check_labels: bool,
    /// Shuffle seed for a reproducible split.
    #[arg(long)]
    seed: Option<u64>,
    /// Progress rendering: auto, plain, or pretty.
    #[arg(long)]
    ui: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let ratios = SplitRatios::new(args.train_ratio, args.val_ratio, args.test_ratio);
    ratios.validate()?;

    let ui = Ui::from_flag(args.ui.as_deref(), std::io::stderr().is_terminal());
    let opts = PrepareOptions {
        source_dir: args.source_dir.clone(),
        output_dir: args.output_dir.clone(),
        ratios,
        resize: (args.resize > 0).then_some(args.resize),
        check_labels: args.check_labels,
        seed: args.seed,
    };

    let mut preparer = DatasetPreparer::new(opts);
    let stats = preparer.prepare(&ui)?;

    println!("dataset summary:");
    println!("  source:       {}", args.source_dir.display());
    println!("  output:       {}", args.output_dir.display());
    println!("  total images: {}", stats.total_images);
    println!("  train:        {}", stats.train_images);
    println!("  val:          {}", stats.val_images);
    println!("  test:         {}", stats.test_images);
    if args.check_labels {
        println!("  labeled boxes per class:");
        for (class_id, count) in &stats.class_distribution {
            println!("    class {}: {}", class_id, count);
        }
    }

    Ok(())
}
