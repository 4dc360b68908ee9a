//! Connector check kernel.
//!
//! Watches physical connector points on an assembled device (power, USB,
//! HDMI, ethernet, audio) through camera imagery. An external object-detection
//! model locates and classifies connector states per frame; this crate turns
//! those raw detections into per-connector verdicts, alerts for abnormal
//! states, and an aggregate session report.
//!
//! # Module Structure
//!
//! - `taxonomy`: static class-id → connector/state table
//! - `detect`: detector backend contract, registry, and the synthetic stub
//! - `interpret`: per-frame fold of detections into a status map + alerts
//! - `report`: report construction and the append-only session accumulator
//! - `policy` / `realtime`: the two state-evaluation strategies and the
//!   live-loop frame verdicts
//! - `labels`: YOLO-style label file format
//! - `dataset`: train/val/test partitioning with letterbox resize
//! - `ingest` / `frame`: synthetic camera source for the live loop
//! - `config` / `ui`: runtime configuration and console progress

pub mod config;
pub mod dataset;
pub mod detect;
pub mod frame;
pub mod ingest;
pub mod interpret;
pub mod labels;
pub mod policy;
pub mod realtime;
pub mod report;
pub mod taxonomy;
pub mod ui;

pub use detect::{BackendRegistry, Detection, DetectionCapability, DetectorBackend, StubBackend};
pub use interpret::{interpret, Alert, Interpretation, PortStatus, StatusMap, FUSION_POLICY};
pub use policy::{Assessment, ConfidencePolicy, DetectionPolicy, TaxonomyPolicy};
pub use realtime::{FrameVerdict, DEFAULT_ALERT_THRESHOLD, MIN_RENDER_CONFIDENCE};
pub use report::{OverallStatus, Report, Session, Summary};
pub use taxonomy::{ClassEntry, ConnectorType, LinkState, Taxonomy};
