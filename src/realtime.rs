//! Frame-level verdicts for the live check loop.
//!
//! The live loop annotates each frame with per-detection assessments and a
//! single aggregate banner. One abnormal detection flips the whole frame,
//! regardless of connector type.

use crate::detect::Detection;
use crate::policy::{Assessment, DetectionPolicy};
use crate::taxonomy::Taxonomy;

/// Default alert threshold for the live confidence policy.
pub const DEFAULT_ALERT_THRESHOLD: f32 = 0.7;

/// Detections below this confidence are not rendered or assessed.
pub const MIN_RENDER_CONFIDENCE: f32 = 0.3;

/// One rendered detection: the raw box, its label, and the policy's verdict.
#[derive(Clone, Debug)]
pub struct AssessedDetection {
    pub detection: Detection,
    pub label: String,
    pub assessment: Assessment,
}

impl AssessedDetection {
    /// One-line overlay text, e.g. `power_cable_connected normal (0.92)`.
    pub fn overlay_line(&self) -> String {
        let status = match self.assessment {
            Assessment::Nominal => "normal",
            Assessment::Alerting => "abnormal",
            Assessment::Unrecognized => "unrecognized",
        };
        format!("{} {} ({:.2})", self.label, status, self.detection.confidence)
    }
}

/// Aggregate verdict for one live frame.
#[derive(Clone, Debug)]
pub struct FrameVerdict {
    pub assessments: Vec<AssessedDetection>,
    pub all_normal: bool,
}

impl FrameVerdict {
    /// Assess every detection at or above the render floor under `policy`.
    /// Any `Alerting` assessment marks the frame abnormal.
    pub fn evaluate(
        detections: &[Detection],
        policy: &dyn DetectionPolicy,
        taxonomy: &Taxonomy,
    ) -> Self {
        let mut assessments = Vec::new();
        let mut all_normal = true;

        for det in detections {
            if det.confidence <= MIN_RENDER_CONFIDENCE {
                continue;
            }
            let label = taxonomy
                .class_name(det.class_id)
                .unwrap_or_else(|| "unknown".to_string());
            let assessment = policy.assess(det);
            if assessment == Assessment::Alerting {
                all_normal = false;
            }
            assessments.push(AssessedDetection {
                detection: det.clone(),
                label,
                assessment,
            });
        }

        Self {
            assessments,
            all_normal,
        }
    }

    /// The single aggregate banner drawn over the frame.
    pub fn banner(&self) -> &'static str {
        if self.all_normal {
            "all cables normal"
        } else {
            "abnormal cable detected!"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ConfidencePolicy;

    fn det(confidence: f32, class_id: u32) -> Detection {
        Detection::new([0.0, 0.0, 20.0, 20.0], confidence, class_id)
    }

    #[test]
    fn one_abnormal_detection_flips_the_frame() {
        let taxonomy = Taxonomy::standard();
        let policy = ConfidencePolicy::new(DEFAULT_ALERT_THRESHOLD);
        let verdict = FrameVerdict::evaluate(
            &[det(0.9, 0), det(0.5, 2), det(0.8, 4)],
            &policy,
            &taxonomy,
        );

        assert_eq!(verdict.assessments.len(), 3);
        assert!(!verdict.all_normal);
        assert_eq!(verdict.banner(), "abnormal cable detected!");
    }

    #[test]
    fn all_nominal_frame_keeps_the_normal_banner() {
        let taxonomy = Taxonomy::standard();
        let policy = ConfidencePolicy::new(DEFAULT_ALERT_THRESHOLD);
        let verdict = FrameVerdict::evaluate(&[det(0.9, 0), det(0.75, 2)], &policy, &taxonomy);

        assert!(verdict.all_normal);
        assert_eq!(verdict.banner(), "all cables normal");
    }

    #[test]
    fn detections_below_render_floor_are_skipped() {
        let taxonomy = Taxonomy::standard();
        let policy = ConfidencePolicy::new(DEFAULT_ALERT_THRESHOLD);
        // 0.2 is below the floor: neither rendered nor allowed to flip the frame
        let verdict = FrameVerdict::evaluate(&[det(0.2, 0), det(0.9, 2)], &policy, &taxonomy);

        assert_eq!(verdict.assessments.len(), 1);
        assert!(verdict.all_normal);
    }

    #[test]
    fn empty_frame_is_all_normal() {
        let taxonomy = Taxonomy::standard();
        let policy = ConfidencePolicy::new(DEFAULT_ALERT_THRESHOLD);
        let verdict = FrameVerdict::evaluate(&[], &policy, &taxonomy);
        assert!(verdict.all_normal);
        assert!(verdict.assessments.is_empty());
    }

    #[test]
    fn unknown_class_renders_with_unknown_label() {
        let taxonomy = Taxonomy::standard();
        let policy = ConfidencePolicy::new(DEFAULT_ALERT_THRESHOLD);
        let verdict = FrameVerdict::evaluate(&[det(0.9, 42)], &policy, &taxonomy);
        assert_eq!(verdict.assessments[0].label, "unknown");
        assert_eq!(verdict.assessments[0].overlay_line(), "unknown normal (0.90)");
    }
}
