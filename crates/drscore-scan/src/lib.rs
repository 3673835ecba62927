//! Reads an inventory snapshot from disk, scores it and renders the outcome
//! as JSON. Configuration comes from `DRSCORE_*` environment variables.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod telemetry;

pub use config::{LogFormat, LogSettings, ScanConfig};
pub use error::ScanError;
pub use pipeline::{Gate, ScanOutcome, run, write_outcome};
pub use telemetry::init_tracing;
