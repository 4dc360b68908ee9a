use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::detect::backend::{DetectionCapability, DetectorBackend};
use crate::detect::result::Detection;

/// Stub backend for demos and tests.
///
/// Derives a deterministic set of synthetic connector detections from a hash
/// of the frame pixels, so identical frames yield identical detections and a
/// changing scene yields a changing report. Class ids follow the standard
/// ten-class table (`2 * n` connected, `2 * n + 1` disconnected).
pub struct StubBackend;

impl StubBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn supports(&self, capability: DetectionCapability) -> bool {
        matches!(capability, DetectionCapability::ConnectorDetection)
    }

    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<Detection>> {
        let digest: [u8; 32] = Sha256::digest(pixels).into();
        let mut detections = Vec::new();

        // One candidate slot per connector type; one in four frames drops it.
        for slot in 0..5usize {
            let seed = digest[slot];
            if seed % 4 == 3 {
                continue;
            }
            let state_bit = u32::from((seed >> 2) & 1);
            let class_id = 2 * slot as u32 + state_bit;
            let confidence = 0.35 + f32::from(digest[slot + 5] % 128) / 200.0;

            let w = width as f32;
            let h = height as f32;
            let cx = (f32::from(digest[slot + 10]) / 255.0) * w;
            let cy = (f32::from(digest[slot + 15]) / 255.0) * h;
            let half = (0.05 + f32::from(digest[slot + 20] % 32) / 255.0) * w.min(h) / 2.0;

            detections.push(Detection::new(
                [
                    (cx - half).max(0.0),
                    (cy - half).max(0.0),
                    (cx + half).min(w),
                    (cy + half).min(h),
                ],
                confidence,
                class_id,
            ));
        }

        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_pixels_same_detections() {
        let mut backend = StubBackend::new();
        let pixels = vec![7u8; 64 * 48 * 3];
        let a = backend.detect(&pixels, 64, 48).unwrap();
        let b = backend.detect(&pixels, 64, 48).unwrap();
        assert_eq!(a.len(), b.len());
        for (left, right) in a.iter().zip(&b) {
            assert_eq!(left.class_id, right.class_id);
            assert_eq!(left.confidence, right.confidence);
        }
    }

    #[test]
    fn detections_stay_inside_frame_and_class_space() {
        let mut backend = StubBackend::new();
        for fill in [0u8, 3, 9, 77, 200] {
            let pixels = vec![fill; 32 * 32 * 3];
            for det in backend.detect(&pixels, 32, 32).unwrap() {
                assert!(det.class_id < 10);
                assert!((0.0..=1.0).contains(&det.confidence));
                assert!(det.x1 >= 0.0 && det.x2 <= 32.0);
                assert!(det.y1 >= 0.0 && det.y2 <= 32.0);
                assert!(det.width() > 0.0 && det.height() > 0.0);
            }
        }
    }
}
