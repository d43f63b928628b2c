//! pushmon-core — versioned normalization engine for project-pushed monitors.
//!
//! A project push hands over a batch of loosely typed monitor definitions.
//! The engine resolves each record's type, selects the schema that applies to
//! the requesting product version, fills in every default, and reports what
//! it could not accept.
//!
//! # Architecture
//!
//! ```text
//! RawMonitorRecord ──► Orchestrator ──► SchemaRegistry (type, version)
//!                          │
//!                          ├──► Normalizers (icmp / tcp / http / browser)
//!                          │        └──► coerce
//!                          └──► Detector (unsupported keys)
//!                                   │
//!                                   ▼
//!                        NormalizedMonitorResult
//! ```
//!
//! Normalization is pure: no I/O, no shared mutable state. The registry is
//! read-only after load and can be shared freely.

pub mod coerce;
pub mod config;
pub mod detector;
pub mod error;
pub mod normalizers;
pub mod orchestrator;
pub mod registry;
pub mod types;
pub mod version;

pub use error::{MonitorError, RegistryError, VersionError};
pub use normalizers::NormalizedMonitorFields;
pub use orchestrator::{normalize_project_monitors, ProjectMonitorNormalizer};
pub use registry::SchemaRegistry;
pub use types::{
    Location, MonitorLocation, MonitorType, NormalizationContext, NormalizationError,
    NormalizedMonitorResult, PrivateLocation, RawMonitorRecord,
};
pub use version::{ProductVersion, VersionRange};
