use serde::{Deserialize, Serialize};

/// One raw detection reported by the external detector for a single frame.
///
/// Box corners are in pixel space. The class id space is defined by the
/// `Taxonomy` the caller supplies; nothing here interprets it. The detector
/// guarantees neither ordering nor absence of duplicate boxes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Detection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    /// Confidence in 0..=1.
    pub confidence: f32,
    pub class_id: u32,
}

impl Detection {
    pub fn new(bbox: [f32; 4], confidence: f32, class_id: u32) -> Self {
        Self {
            x1: bbox[0],
            y1: bbox[1],
            x2: bbox[2],
            y2: bbox[3],
            confidence,
            class_id,
        }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}
