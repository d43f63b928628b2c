//! pushmon — normalizes project-pushed uptime monitor definitions into the
//! canonical field maps heartbeat runs.
//!
//! The engine lives in [`pushmon_core`]; this crate adds batch-file loading
//! and the command-line front end, and re-exports the engine so integration
//! tests and benches can import everything from one place.
//!
//! # Architecture
//!
//! ```text
//! batch.json ──► BatchFile ──► ProjectMonitorNormalizer ──► JSON results
//!                                   │
//!                        SchemaRegistry (built-in or --registry)
//! ```

pub mod batch;

pub use pushmon_core::*;
