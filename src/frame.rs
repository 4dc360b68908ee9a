use serde::Serialize;

/// One captured RGB frame handed from a camera source to the detector.
///
/// Pixels are tightly packed RGB8, row-major. Frames are owned by the capture
/// loop and borrowed by the detector for the duration of one `detect` call.
#[derive(Clone, Debug)]
pub struct Frame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Monotonic capture index within one run.
    pub index: u64,
}

impl Frame {
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, index: u64) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 3) as usize);
        Self {
            pixels,
            width,
            height,
            index,
        }
    }

    /// Frame identifier used in reports, e.g. `frame:000042`.
    pub fn reference(&self) -> String {
        format!("frame:{:06}", self.index)
    }
}

/// Capture counters reported when a source shuts down.
#[derive(Clone, Debug, Serialize)]
pub struct CaptureStats {
    pub frames_captured: u64,
    pub device: String,
}
