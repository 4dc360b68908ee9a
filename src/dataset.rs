//! Dataset partitioning for detector training.
//!
//! Discovers raw images, shuffles, splits into train/val/test by ratio, and
//! materializes the split as an `images/` + `labels/` tree, optionally
//! letterboxing every image to a square canvas. A statistics report is
//! written alongside the output.
//!
//! Split boundaries truncate: `train_end = floor(N * train_ratio)` and
//! `val_end = train_end + floor(N * val_ratio)`, with the remainder going to
//! test. The realized test fraction can therefore exceed the requested ratio
//! by up to `2/N`. That rounding bias is inherited behavior, pinned by tests;
//! do not "improve" it without flagging the change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use walkdir::WalkDir;

use crate::labels::read_labels;
use crate::ui::Ui;

/// Discovered image extensions, matched case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "tiff"];

/// Neutral letterbox fill, the conventional detector-training gray.
const LETTERBOX_FILL: Rgb<u8> = Rgb([114, 114, 114]);

const RATIO_TOLERANCE: f64 = 0.001;

const SPLIT_NAMES: [&str; 3] = ["train", "val", "test"];

/// Requested split ratios. Must sum to 1.0 within `RATIO_TOLERANCE`.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SplitRatios {
    pub train: f64,
    pub val: f64,
    pub test: f64,
}

impl SplitRatios {
    pub fn new(train: f64, val: f64, test: f64) -> Self {
        Self { train, val, test }
    }

    /// Reject ratio sets whose sum strays from 1.0. Called before any
    /// filesystem mutation.
    pub fn validate(&self) -> Result<()> {
        let sum = self.train + self.val + self.test;
        if (sum - 1.0).abs() > RATIO_TOLERANCE {
            return Err(anyhow!(
                "split ratios must sum to 1.0 (got {:.3})",
                sum
            ));
        }
        Ok(())
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.7,
            val: 0.2,
            test: 0.1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PrepareOptions {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub ratios: SplitRatios,
    /// Letterbox every image to this square size; `None` copies verbatim.
    pub resize: Option<u32>,
    /// Verify label presence and count per-class box distribution.
    pub check_labels: bool,
    /// Shuffle seed. `None` draws from entropy, making the partition
    /// non-reproducible across runs.
    pub seed: Option<u64>,
}

/// Accumulated per-split counts, serialized into the statistics report.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DatasetStats {
    pub total_images: u64,
    pub train_images: u64,
    pub val_images: u64,
    pub test_images: u64,
    pub class_distribution: BTreeMap<u32, u64>,
}

/// Exhaustive, disjoint partition of the discovered files.
#[derive(Clone, Debug)]
pub struct SplitSet {
    pub train: Vec<PathBuf>,
    pub val: Vec<PathBuf>,
    pub test: Vec<PathBuf>,
}

impl SplitSet {
    fn named(&self) -> [(&'static str, &[PathBuf]); 3] {
        [
            ("train", &self.train),
            ("val", &self.val),
            ("test", &self.test),
        ]
    }
}

/// Truncating split boundaries over a shuffled file list of length `total`.
pub fn split_boundaries(total: usize, ratios: SplitRatios) -> (usize, usize) {
    let train_end = ((total as f64 * ratios.train) as usize).min(total);
    let val_end = (train_end + (total as f64 * ratios.val) as usize).min(total);
    (train_end, val_end)
}

/// Shuffle and partition `files`. A fixed seed makes the partition
/// reproducible for a given discovery order.
pub fn partition(mut files: Vec<PathBuf>, ratios: SplitRatios, seed: Option<u64>) -> SplitSet {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    files.shuffle(&mut rng);

    let (train_end, val_end) = split_boundaries(files.len(), ratios);
    let test = files.split_off(val_end);
    let val = files.split_off(train_end);
    SplitSet {
        train: files,
        val,
        test,
    }
}

/// True when the path carries one of the supported image extensions.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Discover image files recursively under `dir`, sorted for a stable
/// order (seeded shuffles stay reproducible across runs).
pub fn find_images(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_image_path(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Aspect-preserving downscale, then center the result on a neutral-gray
/// square canvas. Images already inside the target square are padded without
/// resampling (downscale only, never upscale).
pub fn letterbox_copy(src: &Path, dst: &Path, size: u32) -> Result<()> {
    let img = image::open(src).with_context(|| format!("opening {}", src.display()))?;
    let img = if img.width() > size || img.height() > size {
        img.resize(size, size, FilterType::Lanczos3)
    } else {
        img
    };
    let rgb = img.to_rgb8();
    let mut canvas = RgbImage::from_pixel(size, size, LETTERBOX_FILL);
    let x = i64::from((size - rgb.width()) / 2);
    let y = i64::from((size - rgb.height()) / 2);
    imageops::overlay(&mut canvas, &rgb, x, y);
    canvas
        .save(dst)
        .with_context(|| format!("writing {}", dst.display()))?;
    Ok(())
}

/// The five-class training taxonomy used in dataset statistics. Distinct
/// from the ten-class detection taxonomy: training data labels only the
/// nominal state of each connector.
pub fn training_class_names() -> BTreeMap<u32, &'static str> {
    [
        (0, "power_normal"),
        (1, "usb_normal"),
        (2, "hdmi_normal"),
        (3, "ethernet_normal"),
        (4, "audio_normal"),
    ]
    .into_iter()
    .collect()
}

#[derive(Serialize)]
struct DatasetInfo {
    source_directory: String,
    output_directory: String,
    split_ratios: SplitRatios,
}

#[derive(Serialize)]
struct DatasetReport<'a> {
    dataset_info: DatasetInfo,
    statistics: &'a DatasetStats,
    class_names: BTreeMap<u32, &'static str>,
}

pub struct DatasetPreparer {
    opts: PrepareOptions,
    stats: DatasetStats,
}

impl DatasetPreparer {
    pub fn new(opts: PrepareOptions) -> Self {
        Self {
            opts,
            stats: DatasetStats::default(),
        }
    }

    /// Run the full pipeline: validate, discover, split, materialize,
    /// report. A single file's failure is logged and skipped; the batch
    /// continues.
    pub fn prepare(&mut self, ui: &Ui) -> Result<DatasetStats> {
        self.opts.ratios.validate()?;

        let files = {
            let _stage = ui.stage("discover images");
            find_images(&self.opts.source_dir)
        };
        if files.is_empty() {
            return Err(anyhow!(
                "no image files found under {}",
                self.opts.source_dir.display()
            ));
        }
        log::info!("found {} images", files.len());

        self.create_directory_structure()?;

        let split = partition(files, self.opts.ratios, self.opts.seed);
        log::info!(
            "split: train {} / val {} / test {}",
            split.train.len(),
            split.val.len(),
            split.test.len()
        );

        for (name, files) in split.named() {
            self.process_split(name, files, ui)?;
        }

        let report_path = self.write_report()?;
        log::info!("dataset report written to {}", report_path.display());

        Ok(self.stats.clone())
    }

    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }

    fn create_directory_structure(&self) -> Result<()> {
        for kind in ["images", "labels"] {
            for split in SPLIT_NAMES {
                let dir = self.opts.output_dir.join(kind).join(split);
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }
        }
        Ok(())
    }

    fn process_split(&mut self, split: &str, files: &[PathBuf], ui: &Ui) -> Result<()> {
        let image_dir = self.opts.output_dir.join("images").join(split);
        let label_dir = self.opts.output_dir.join("labels").join(split);
        let mut tracker = ui.tracker(&format!("{} set", split), files.len() as u64);

        for src in files {
            tracker.inc();
            let Some(file_name) = src.file_name() else {
                continue;
            };
            let dst = image_dir.join(file_name);

            let copied = match self.opts.resize {
                Some(size) => letterbox_copy(src, &dst, size),
                None => std::fs::copy(src, &dst).map(|_| ()).map_err(Into::into),
            };
            if let Err(err) = copied {
                log::warn!("skipping {}: {:#}", src.display(), err);
                continue;
            }
            self.bump(split);

            let label_src = src.with_extension("txt");
            if label_src.exists() {
                let label_dst = label_dir.join(Path::new(file_name).with_extension("txt"));
                if let Err(err) = std::fs::copy(&label_src, &label_dst) {
                    log::warn!("failed to copy label {}: {}", label_src.display(), err);
                } else if self.opts.check_labels {
                    self.count_classes(&label_src);
                }
            } else if self.opts.check_labels {
                log::warn!("no label file for {}", src.display());
            }
        }

        tracker.finish();
        Ok(())
    }

    fn bump(&mut self, split: &str) {
        self.stats.total_images += 1;
        match split {
            "train" => self.stats.train_images += 1,
            "val" => self.stats.val_images += 1,
            _ => self.stats.test_images += 1,
        }
    }

    fn count_classes(&mut self, label_path: &Path) {
        match read_labels(label_path) {
            Ok(boxes) => {
                for label_box in boxes {
                    *self
                        .stats
                        .class_distribution
                        .entry(label_box.class_id)
                        .or_insert(0) += 1;
                }
            }
            Err(err) => log::warn!("unreadable label {}: {}", label_path.display(), err),
        }
    }

    fn write_report(&self) -> Result<PathBuf> {
        let path = self.opts.output_dir.join("dataset_report.json");
        let report = DatasetReport {
            dataset_info: DatasetInfo {
                source_directory: self.opts.source_dir.display().to_string(),
                output_directory: self.opts.output_dir.display().to_string(),
                split_ratios: self.opts.ratios,
            },
            statistics: &self.stats,
            class_names: training_class_names(),
        };
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing dataset report to {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn fake_files(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("img_{i:04}.jpg"))).collect()
    }

    #[test]
    fn boundaries_floor_truncate() {
        let ratios = SplitRatios::default();
        assert_eq!(split_boundaries(100, ratios), (70, 90));
        // 7 * 0.7 = 4.9 -> 4, 7 * 0.2 = 1.4 -> 1, remainder 2: test
        // exceeds its nominal share, which is the inherited behavior.
        assert_eq!(split_boundaries(7, ratios), (4, 5));
        assert_eq!(split_boundaries(0, ratios), (0, 0));
    }

    #[test]
    fn partition_is_exhaustive_and_disjoint() {
        let files = fake_files(100);
        let expected: BTreeSet<_> = files.iter().cloned().collect();
        let split = partition(files, SplitRatios::default(), Some(7));

        assert_eq!(split.train.len(), 70);
        assert_eq!(split.val.len(), 20);
        assert_eq!(split.test.len(), 10);

        let mut seen = BTreeSet::new();
        for file in split.train.iter().chain(&split.val).chain(&split.test) {
            assert!(seen.insert(file.clone()), "duplicate {}", file.display());
        }
        assert_eq!(seen, expected);
    }

    #[test]
    fn small_set_gives_test_the_remainder() {
        let split = partition(fake_files(7), SplitRatios::default(), Some(1));
        assert_eq!(split.train.len(), 4);
        assert_eq!(split.val.len(), 1);
        assert_eq!(split.test.len(), 2);
    }

    #[test]
    fn same_seed_same_partition() {
        let a = partition(fake_files(50), SplitRatios::default(), Some(99));
        let b = partition(fake_files(50), SplitRatios::default(), Some(99));
        assert_eq!(a.train, b.train);
        assert_eq!(a.val, b.val);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn ratio_sum_outside_tolerance_is_rejected() {
        assert!(SplitRatios::new(0.5, 0.3, 0.25).validate().is_err());
        assert!(SplitRatios::default().validate().is_ok());
        // within the 0.001 tolerance
        assert!(SplitRatios::new(0.6999, 0.2, 0.1).validate().is_ok());
    }

    #[test]
    fn image_extension_match_is_case_insensitive() {
        assert!(is_image_path(Path::new("shot.JPG")));
        assert!(is_image_path(Path::new("shot.jpeg")));
        assert!(is_image_path(Path::new("shot.Tiff")));
        assert!(!is_image_path(Path::new("shot.txt")));
        assert!(!is_image_path(Path::new("shot")));
    }
}
