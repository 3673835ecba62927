//! DR-readiness rule evaluation.
//!
//! The rule catalog is a static table ([`catalog::catalog`]); each entry names
//! its domain, base penalty, optional profile category and a check function.
//! [`evaluate`] runs the table once over an inventory and its restore
//! simulation and returns the clamped domain scores plus every finding.

pub mod catalog;
pub mod context;
pub mod engine;
pub mod rule;
pub mod rules;
pub mod summary;

pub use catalog::{catalog, rule};
pub use context::RuleContext;
pub use engine::{Evaluation, evaluate, evaluate_rules};
pub use rule::{Check, Offense, Rule};
pub use summary::{aggregate_id, join_first};
