//! State-evaluation strategies for single detections.
//!
//! Two policies coexist deliberately. The batch engine reads the taxonomy's
//! connected/disconnected semantics; the live loop historically classified by
//! confidence threshold alone, ignoring what the class label means. Both ship
//! as named strategies behind one trait so callers choose explicitly instead
//! of relying on which code path happens to run.

use crate::detect::Detection;
use crate::taxonomy::{LinkState, Taxonomy};

/// Verdict for one detection under a policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assessment {
    Nominal,
    Alerting,
    /// Class id not in the taxonomy; contributes nothing.
    Unrecognized,
}

pub trait DetectionPolicy {
    fn name(&self) -> &'static str;

    fn assess(&self, det: &Detection) -> Assessment;
}

/// Live-loop policy: nominal iff confidence clears the alert threshold,
/// regardless of the class label's semantics.
#[derive(Clone, Copy, Debug)]
pub struct ConfidencePolicy {
    pub alert_threshold: f32,
}

impl ConfidencePolicy {
    pub fn new(alert_threshold: f32) -> Self {
        Self { alert_threshold }
    }
}

impl DetectionPolicy for ConfidencePolicy {
    fn name(&self) -> &'static str {
        "confidence"
    }

    fn assess(&self, det: &Detection) -> Assessment {
        if det.confidence >= self.alert_threshold {
            Assessment::Nominal
        } else {
            Assessment::Alerting
        }
    }
}

/// Batch-engine semantics exposed through the same seam: connected is
/// nominal, disconnected alerts, unknown ids are dropped.
#[derive(Clone, Debug)]
pub struct TaxonomyPolicy {
    taxonomy: Taxonomy,
}

impl TaxonomyPolicy {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }
}

impl DetectionPolicy for TaxonomyPolicy {
    fn name(&self) -> &'static str {
        "taxonomy"
    }

    fn assess(&self, det: &Detection) -> Assessment {
        match self.taxonomy.resolve(det.class_id) {
            Some(entry) => match entry.state {
                LinkState::Connected => Assessment::Nominal,
                LinkState::Disconnected => Assessment::Alerting,
            },
            None => Assessment::Unrecognized,
        }
    }
}
