//! YOLO-style label files.
//!
//! One box per line, five whitespace-separated tokens:
//! `class_id x_center y_center width height`, geometry normalized to [0,1]
//! relative to image dimensions. Lines with any other token count, or with
//! unparsable numbers, are silently skipped on read.

use std::path::Path;

use anyhow::{Context, Result};

use crate::detect::Detection;

/// One labeled box in normalized center/size form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelBox {
    pub class_id: u32,
    pub x_center: f32,
    pub y_center: f32,
    pub width: f32,
    pub height: f32,
}

impl LabelBox {
    /// Convert a pixel-space detection into a normalized label box.
    pub fn from_detection(det: &Detection, image_width: u32, image_height: u32) -> Self {
        let w = image_width as f32;
        let h = image_height as f32;
        Self {
            class_id: det.class_id,
            x_center: (det.x1 + det.x2) / 2.0 / w,
            y_center: (det.y1 + det.y2) / 2.0 / h,
            width: det.width() / w,
            height: det.height() / h,
        }
    }
}

/// Parse one label line. Returns `None` for malformed lines.
pub fn parse_line(line: &str) -> Option<LabelBox> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 5 {
        return None;
    }
    Some(LabelBox {
        class_id: tokens[0].parse().ok()?,
        x_center: tokens[1].parse().ok()?,
        y_center: tokens[2].parse().ok()?,
        width: tokens[3].parse().ok()?,
        height: tokens[4].parse().ok()?,
    })
}

/// Read a label file, dropping malformed lines without error.
pub fn read_labels(path: &Path) -> Result<Vec<LabelBox>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading label file {}", path.display()))?;
    Ok(raw.lines().filter_map(parse_line).collect())
}

/// Write label boxes with six-decimal fixed precision.
pub fn write_labels(path: &Path, boxes: &[LabelBox]) -> Result<()> {
    let mut out = String::new();
    for b in boxes {
        out.push_str(&format!(
            "{} {:.6} {:.6} {:.6} {:.6}\n",
            b.class_id, b.x_center, b.y_center, b.width, b.height
        ));
    }
    std::fs::write(path, out).with_context(|| format!("writing label file {}", path.display()))?;
    Ok(())
}
