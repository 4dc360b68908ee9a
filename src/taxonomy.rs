//! Static class taxonomy for the connector detector.
//!
//! The external model is trained on ten classes: five connector types, each
//! in a connected or disconnected state. The taxonomy maps the detector's
//! integer class ids onto that semantic space. It is loaded once and never
//! changes for the lifetime of the process.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Physical connector types monitored on the bench.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorType {
    Power,
    Usb,
    Hdmi,
    Ethernet,
    Audio,
}

impl ConnectorType {
    /// All monitored connector types, in report order.
    pub const ALL: [ConnectorType; 5] = [
        ConnectorType::Power,
        ConnectorType::Usb,
        ConnectorType::Hdmi,
        ConnectorType::Ethernet,
        ConnectorType::Audio,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConnectorType::Power => "power",
            ConnectorType::Usb => "usb",
            ConnectorType::Hdmi => "hdmi",
            ConnectorType::Ethernet => "ethernet",
            ConnectorType::Audio => "audio",
        }
    }
}

/// Binary link state carried by a class label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    Connected,
    Disconnected,
}

impl LinkState {
    pub fn label(&self) -> &'static str {
        match self {
            LinkState::Connected => "connected",
            LinkState::Disconnected => "disconnected",
        }
    }
}

/// Semantic meaning of one detector class id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassEntry {
    pub connector: ConnectorType,
    pub state: LinkState,
}

/// Class-id lookup table supplied by the caller alongside detector output.
///
/// Lookup is pure: an unregistered id resolves to `None` and nothing else
/// happens. Detections carrying such ids are dropped upstream without a log
/// line.
#[derive(Clone, Debug)]
pub struct Taxonomy {
    entries: HashMap<u32, ClassEntry>,
}

impl Taxonomy {
    /// The standard ten-class table the connector model is trained on:
    /// class `2 * n` is connector `n` connected, `2 * n + 1` disconnected.
    pub fn standard() -> Self {
        let mut entries = HashMap::new();
        for (n, connector) in ConnectorType::ALL.into_iter().enumerate() {
            entries.insert(
                2 * n as u32,
                ClassEntry {
                    connector,
                    state: LinkState::Connected,
                },
            );
            entries.insert(
                2 * n as u32 + 1,
                ClassEntry {
                    connector,
                    state: LinkState::Disconnected,
                },
            );
        }
        Self { entries }
    }

    /// Build a taxonomy from explicit `(class_id, entry)` pairs.
    pub fn from_entries(pairs: impl IntoIterator<Item = (u32, ClassEntry)>) -> Self {
        Self {
            entries: pairs.into_iter().collect(),
        }
    }

    /// Resolve a class id. `None` is the unknown sentinel.
    pub fn resolve(&self, class_id: u32) -> Option<ClassEntry> {
        self.entries.get(&class_id).copied()
    }

    /// Human-readable class name, e.g. `power_cable_connected`.
    pub fn class_name(&self, class_id: u32) -> Option<String> {
        self.resolve(class_id)
            .map(|entry| format!("{}_cable_{}", entry.connector.label(), entry.state.label()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::standard()
    }
}
