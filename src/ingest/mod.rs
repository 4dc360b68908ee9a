//! Camera frame sources for the live check loop.
//!
//! Only the synthetic `stub://` source ships with the crate; genuine camera
//! capture (V4L2, RTSP, vendor SDKs) is an external integration that plugs in
//! behind the same `connect`/`next_frame` surface. The stub produces a slowly
//! drifting scene so downstream detection output varies between frames.

use anyhow::{anyhow, Result};

use crate::config::CameraSettings;
use crate::frame::{CaptureStats, Frame};

/// Frames per synthetic scene change.
const SCENE_PERIOD: u64 = 50;

pub struct CameraSource {
    settings: CameraSettings,
    frame_count: u64,
    scene_state: u8,
}

impl CameraSource {
    /// Open a camera source. Only `stub://` devices are built in.
    pub fn new(settings: CameraSettings) -> Result<Self> {
        if !settings.device.starts_with("stub://") {
            return Err(anyhow!(
                "camera device '{}' requires an external capture integration; \
                 only stub:// sources are built in",
                settings.device
            ));
        }
        Ok(Self {
            settings,
            frame_count: 0,
            scene_state: 0,
        })
    }

    pub fn connect(&mut self) -> Result<()> {
        log::info!(
            "CameraSource: connected to {} (synthetic, {}x{} @ {} fps)",
            self.settings.device,
            self.settings.width,
            self.settings.height,
            self.settings.target_fps
        );
        Ok(())
    }

    /// Capture the next frame. Blocking in real integrations; the stub
    /// returns immediately and the caller paces the loop.
    pub fn next_frame(&mut self) -> Result<Frame> {
        self.frame_count += 1;
        if self.frame_count % SCENE_PERIOD == 0 {
            self.scene_state = self.scene_state.wrapping_add(1);
        }

        let pixel_count = (self.settings.width * self.settings.height * 3) as usize;
        let mut pixels = vec![0u8; pixel_count];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 + self.frame_count + u64::from(self.scene_state)) % 256) as u8;
        }

        Ok(Frame::new(
            pixels,
            self.settings.width,
            self.settings.height,
            self.frame_count,
        ))
    }

    pub fn is_healthy(&self) -> bool {
        true
    }

    pub fn stats(&self) -> CaptureStats {
        CaptureStats {
            frames_captured: self.frame_count,
            device: self.settings.device.clone(),
        }
    }
}
