//! Detection interpretation: folds raw detections for one frame into a
//! per-connector status map and the alerts for abnormal states.
//!
//! The fold never fails. Detections with unrecognized class ids contribute
//! nothing and are dropped without a log line.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::detect::Detection;
use crate::taxonomy::{ConnectorType, LinkState, Taxonomy};

/// Alert record kind for a disconnected connector.
pub const ALERT_KIND_DISCONNECTED: &str = "disconnected_cable";

/// How repeated observations of the same connector type are fused within a
/// single frame.
///
/// The detector gives no ordering guarantee, so `LastObservationWins` makes
/// the result depend on detector output order. That behavior is inherited
/// deliberately and pinned by tests; changing the tie-break is an observable
/// behavior change, not a refactor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FusionPolicy {
    LastObservationWins,
}

pub const FUSION_POLICY: FusionPolicy = FusionPolicy::LastObservationWins;

/// Per-connector verdict for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    Connected,
    Disconnected,
    Unknown,
}

impl PortStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PortStatus::Connected => "connected",
            PortStatus::Disconnected => "disconnected",
            PortStatus::Unknown => "unknown",
        }
    }
}

impl From<LinkState> for PortStatus {
    fn from(state: LinkState) -> Self {
        match state {
            LinkState::Connected => PortStatus::Connected,
            LinkState::Disconnected => PortStatus::Disconnected,
        }
    }
}

/// Status of every monitored connector type. Ordered so serialized reports
/// are stable.
pub type StatusMap = BTreeMap<ConnectorType, PortStatus>;

/// One alert for one disconnected-resolving detection. Created, never
/// mutated; not deduplicated across detections of the same connector type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "cable_type")]
    pub connector: ConnectorType,
    pub confidence: f32,
    pub message: String,
}

impl Alert {
    fn disconnected(connector: ConnectorType, confidence: f32) -> Self {
        Self {
            kind: ALERT_KIND_DISCONNECTED.to_string(),
            connector,
            confidence,
            message: format!(
                "{} cable is disconnected!",
                connector.label().to_uppercase()
            ),
        }
    }
}

/// Result of interpreting one frame's detections.
#[derive(Clone, Debug)]
pub struct Interpretation {
    pub status: StatusMap,
    pub alerts: Vec<Alert>,
}

/// Empty status map: every monitored connector type starts `Unknown`.
pub fn empty_status_map() -> StatusMap {
    ConnectorType::ALL
        .into_iter()
        .map(|connector| (connector, PortStatus::Unknown))
        .collect()
}

/// Fold one frame's detections into a status map plus alerts.
///
/// Status folds in input order; alerts are then emitted, also in input order,
/// for each disconnected-resolving detection whose connector's *final* status
/// is still `Disconnected`. A disconnected observation overwritten by a later
/// connected one therefore raises no alert, while repeated disconnected
/// observations of one connector each raise their own.
pub fn interpret(detections: &[Detection], taxonomy: &Taxonomy) -> Interpretation {
    let mut status = empty_status_map();

    for det in detections {
        let Some(entry) = taxonomy.resolve(det.class_id) else {
            continue;
        };
        match FUSION_POLICY {
            FusionPolicy::LastObservationWins => {
                status.insert(entry.connector, entry.state.into());
            }
        }
    }

    let mut alerts = Vec::new();
    for det in detections {
        let Some(entry) = taxonomy.resolve(det.class_id) else {
            continue;
        };
        if entry.state == LinkState::Disconnected
            && status.get(&entry.connector) == Some(&PortStatus::Disconnected)
        {
            alerts.push(Alert::disconnected(entry.connector, det.confidence));
        }
    }

    Interpretation { status, alerts }
}
