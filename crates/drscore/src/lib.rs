//! Kubernetes DR-readiness scoring.
//!
//! [`assess`] takes an inventory snapshot through the whole pipeline: RPO
//! backfill, restore simulation, rule evaluation and remediation planning.
//! The component crates stay reachable under their short names for callers
//! that need a single stage.

mod pipeline;

pub use drscore_analyze as analyze;
pub use drscore_compare as compare;
pub use drscore_core as scoring;
pub use drscore_model as model;
pub use drscore_remediation as remediation;
pub use drscore_restore as restore;

pub use drscore_compare::{ReportDiff, Trend, diff};
pub use drscore_core::{Maturity, RiskPosture, Score, ScoringProfile};
pub use drscore_model::{AssessmentReport, Finding, Inventory, RecoveryTarget, Severity};
pub use pipeline::assess;
