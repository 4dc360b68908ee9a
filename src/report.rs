//! Per-frame reports and the append-only session that accumulates them.
//!
//! A `Report` is built once per processed image and never mutated. The
//! `Session` is an explicit, caller-owned accumulator: the engine takes no
//! process-global state, and serialization is an explicit step at the end of
//! a run.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::interpret::{Alert, Interpretation, PortStatus, StatusMap};
use crate::taxonomy::ConnectorType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NEEDS_ATTENTION")]
    NeedsAttention,
}

impl OverallStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OverallStatus::Ok => "OK",
            OverallStatus::NeedsAttention => "NEEDS_ATTENTION",
        }
    }
}

/// Counts over connector *types* (not individual detections).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "total_cables")]
    pub total_types: usize,
    pub connected: usize,
    pub disconnected: usize,
    pub unknown: usize,
    pub overall_status: OverallStatus,
}

impl Summary {
    /// `OK` iff no connector type is disconnected. Types left `unknown` do
    /// not prevent an `OK` verdict; that is the inherited policy, preserved
    /// here and pinned by tests rather than silently tightened.
    fn from_status(status: &StatusMap) -> Self {
        let count = |wanted: PortStatus| status.values().filter(|s| **s == wanted).count();
        let disconnected = count(PortStatus::Disconnected);
        Self {
            total_types: status.len(),
            connected: count(PortStatus::Connected),
            disconnected,
            unknown: count(PortStatus::Unknown),
            overall_status: if disconnected == 0 {
                OverallStatus::Ok
            } else {
                OverallStatus::NeedsAttention
            },
        }
    }
}

/// Verdict for one processed image or frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    pub image: String,
    pub timestamp: DateTime<Local>,
    #[serde(rename = "cable_status")]
    pub status: StatusMap,
    pub alerts: Vec<Alert>,
    pub summary: Summary,
}

impl Report {
    pub fn new(image: impl Into<String>, interpretation: Interpretation) -> Self {
        let summary = Summary::from_status(&interpretation.status);
        Self {
            image: image.into(),
            timestamp: Local::now(),
            status: interpretation.status,
            alerts: interpretation.alerts,
            summary,
        }
    }

    /// Render the sectioned console report.
    pub fn print_console(&self) {
        println!("{}", "=".repeat(50));
        println!("CABLE CONNECTION REPORT");
        println!("{}", "=".repeat(50));
        println!("image: {}", self.image);
        println!("time:  {}", self.timestamp.to_rfc3339());
        println!("status:");
        for connector in ConnectorType::ALL {
            let status = self
                .status
                .get(&connector)
                .copied()
                .unwrap_or(PortStatus::Unknown);
            println!(
                "  {:<10} {}",
                connector.label().to_uppercase(),
                status.label().to_uppercase()
            );
        }
        if !self.alerts.is_empty() {
            println!("alerts:");
            for alert in &self.alerts {
                println!("  - {} (confidence: {:.2})", alert.message, alert.confidence);
            }
        }
        println!(
            "summary: {} (connected {}/{})",
            self.summary.overall_status.label(),
            self.summary.connected,
            self.summary.total_types
        );
        println!("{}", "=".repeat(50));
    }
}

/// Ordered, append-only history of the reports produced by one run.
#[derive(Debug, Default)]
pub struct Session {
    reports: Vec<Report>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a report. Reports accumulate in construction order; the
    /// session is never pruned during a run.
    pub fn record(&mut self, report: Report) {
        self.reports.push(report);
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Serialize the full session as a pretty-printed UTF-8 JSON array.
    /// Non-ASCII characters are written unescaped.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.reports)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing session report to {}", path.display()))?;
        Ok(())
    }

    /// Consume the session, yielding the accumulated reports.
    pub fn finish(self) -> Vec<Report> {
        self.reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::{empty_status_map, Interpretation};
    use crate::taxonomy::ConnectorType;

    fn interpretation_with(pairs: &[(ConnectorType, PortStatus)]) -> Interpretation {
        let mut status = empty_status_map();
        for (connector, port_status) in pairs {
            status.insert(*connector, *port_status);
        }
        Interpretation {
            status,
            alerts: Vec::new(),
        }
    }

    #[test]
    fn all_unknown_is_still_ok() {
        let report = Report::new("frame.jpg", interpretation_with(&[]));
        assert_eq!(report.summary.total_types, 5);
        assert_eq!(report.summary.unknown, 5);
        assert_eq!(report.summary.connected, 0);
        assert_eq!(report.summary.disconnected, 0);
        assert_eq!(report.summary.overall_status, OverallStatus::Ok);
    }

    #[test]
    fn single_disconnection_needs_attention() {
        let report = Report::new(
            "frame.jpg",
            interpretation_with(&[
                (ConnectorType::Power, PortStatus::Connected),
                (ConnectorType::Hdmi, PortStatus::Disconnected),
            ]),
        );
        assert_eq!(report.summary.connected, 1);
        assert_eq!(report.summary.disconnected, 1);
        assert_eq!(report.summary.unknown, 3);
        assert_eq!(report.summary.overall_status, OverallStatus::NeedsAttention);
    }

    #[test]
    fn counts_are_over_types_not_detections() {
        // Status map has exactly one entry per connector type by
        // construction, so summary totals can never exceed five.
        let report = Report::new(
            "frame.jpg",
            interpretation_with(&[
                (ConnectorType::Power, PortStatus::Connected),
                (ConnectorType::Usb, PortStatus::Connected),
                (ConnectorType::Hdmi, PortStatus::Connected),
                (ConnectorType::Ethernet, PortStatus::Connected),
                (ConnectorType::Audio, PortStatus::Connected),
            ]),
        );
        assert_eq!(report.summary.total_types, 5);
        assert_eq!(report.summary.connected, 5);
        assert_eq!(report.summary.overall_status, OverallStatus::Ok);
    }

    #[test]
    fn session_appends_in_order() {
        let mut session = Session::new();
        session.record(Report::new("a.jpg", interpretation_with(&[])));
        session.record(Report::new("b.jpg", interpretation_with(&[])));
        assert_eq!(session.len(), 2);
        assert_eq!(session.reports()[0].image, "a.jpg");
        assert_eq!(session.reports()[1].image, "b.jpg");

        let reports = session.finish();
        assert_eq!(reports.len(), 2);
    }
}
