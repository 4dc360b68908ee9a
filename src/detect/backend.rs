use anyhow::Result;

use crate::detect::result::Detection;

/// Detection capabilities supported by backends.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectionCapability {
    /// Locate and classify connector endpoints in a frame.
    ConnectorDetection,
    /// Whole-frame classification without localization.
    Classification,
}

/// Detector backend trait — the boundary to the external model.
///
/// Implementations run the actual inference (ONNX runtime, remote service,
/// synthetic stub). They must treat the pixel slice as read-only and
/// ephemeral: no retention past the `detect` call. Output order is an
/// implementation detail the caller must not rely on.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Returns true when the backend supports a capability.
    fn supports(&self, capability: DetectionCapability) -> bool;

    /// Run detection on an RGB frame, returning raw detections in
    /// pixel-space corner coordinates.
    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<Detection>>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
