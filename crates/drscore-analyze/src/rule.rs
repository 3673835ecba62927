use drscore_core::{Domain, PenaltyCategory};
use drscore_model::Severity;

use crate::context::RuleContext;

pub type Check = fn(&RuleContext<'_>) -> Vec<Offense>;

/// One catalog entry. `penalty` is subtracted from `domain` once per
/// penalized offense, scaled by the profile when `category` is set.
///
/// `tool_gap` marks rules about a detected backup tool's configuration. Their
/// combined deduction stays below what a missing tool costs.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub domain: Domain,
    pub severity: Severity,
    pub penalty: u32,
    pub category: Option<PenaltyCategory>,
    pub message: &'static str,
    pub recommendation: &'static str,
    pub check: Check,
    pub tool_gap: bool,
}

/// A resource that violates a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offense {
    pub resource_id: String,
    pub severity: Option<Severity>,
    pub message: Option<String>,
    pub recommendation: Option<&'static str>,
    pub penalized: bool,
}

impl Offense {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            severity: None,
            message: None,
            recommendation: None,
            penalized: true,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Reported at INFO with its own recommendation and no score impact.
    #[must_use]
    pub const fn informational(mut self, recommendation: &'static str) -> Self {
        self.severity = Some(Severity::Info);
        self.recommendation = Some(recommendation);
        self.penalized = false;
        self
    }
}
