use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::realtime::DEFAULT_ALERT_THRESHOLD;

pub const DEFAULT_CONF_THRESHOLD: f32 = 0.25;
const DEFAULT_REPORT_OUT: &str = "cable_report.json";
const DEFAULT_BACKEND: &str = "stub";
const DEFAULT_CAMERA_DEVICE: &str = "stub://bench_cam";
const DEFAULT_CAMERA_FPS: u32 = 10;
const DEFAULT_CAMERA_WIDTH: u32 = 640;
const DEFAULT_CAMERA_HEIGHT: u32 = 480;

#[derive(Debug, Deserialize, Default)]
struct SentinelConfigFile {
    conf_threshold: Option<f32>,
    alert_threshold: Option<f32>,
    report_out: Option<PathBuf>,
    backend: Option<String>,
    camera: Option<CameraConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    device: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Runtime configuration shared by the check binaries. Loaded from an
/// optional JSON file (`CABLE_SENTINEL_CONFIG`), then overridden by
/// environment variables; CLI flags override both.
#[derive(Debug, Clone)]
pub struct SentinelConfig {
    /// Detection confidence floor; detections below it are discarded.
    pub conf_threshold: f32,
    /// Live-loop alert threshold for the confidence policy.
    pub alert_threshold: f32,
    pub report_out: PathBuf,
    pub backend: String,
    pub camera: CameraSettings,
}

#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub device: String,
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
}

impl SentinelConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("CABLE_SENTINEL_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => read_config_file(Path::new(path))?,
            None => SentinelConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: SentinelConfigFile) -> Self {
        let camera = file.camera.unwrap_or_default();
        Self {
            conf_threshold: file.conf_threshold.unwrap_or(DEFAULT_CONF_THRESHOLD),
            alert_threshold: file.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD),
            report_out: file
                .report_out
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_OUT)),
            backend: file.backend.unwrap_or_else(|| DEFAULT_BACKEND.to_string()),
            camera: CameraSettings {
                device: camera
                    .device
                    .unwrap_or_else(|| DEFAULT_CAMERA_DEVICE.to_string()),
                target_fps: camera.target_fps.unwrap_or(DEFAULT_CAMERA_FPS),
                width: camera.width.unwrap_or(DEFAULT_CAMERA_WIDTH),
                height: camera.height.unwrap_or(DEFAULT_CAMERA_HEIGHT),
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("CABLE_SENTINEL_CONF_THRESHOLD") {
            self.conf_threshold = parse_threshold("CABLE_SENTINEL_CONF_THRESHOLD", &value)?;
        }
        if let Ok(value) = std::env::var("CABLE_SENTINEL_ALERT_THRESHOLD") {
            self.alert_threshold = parse_threshold("CABLE_SENTINEL_ALERT_THRESHOLD", &value)?;
        }
        if let Ok(path) = std::env::var("CABLE_SENTINEL_REPORT_OUT") {
            if !path.trim().is_empty() {
                self.report_out = PathBuf::from(path);
            }
        }
        if let Ok(device) = std::env::var("CABLE_SENTINEL_CAMERA") {
            if !device.trim().is_empty() {
                self.camera.device = device;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("conf_threshold", self.conf_threshold),
            ("alert_threshold", self.alert_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(anyhow!("{} must be within 0..=1 (got {})", name, value));
            }
        }
        if self.camera.target_fps == 0 {
            return Err(anyhow!("camera target_fps must be >= 1"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<SentinelConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))
}

fn parse_threshold(name: &str, value: &str) -> Result<f32> {
    value
        .parse()
        .map_err(|_| anyhow!("{} must be a float in 0..=1", name))
}
