use std::fmt;

use serde::{Deserialize, Serialize};

/// Environment the cluster would be recovered into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryTarget {
    #[default]
    Vm,
    Baremetal,
}

impl RecoveryTarget {
    /// `None` for anything other than `vm` / `baremetal` (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "vm" => Some(Self::Vm),
            "baremetal" | "bare-metal" => Some(Self::Baremetal),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vm => "vm",
            Self::Baremetal => "baremetal",
        }
    }
}

impl fmt::Display for RecoveryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StepCategory {
    Storage,
    Backup,
    Workload,
    Network,
    Config,
}

/// Priority 1 is critical, 2 recommended, 3 optional.
pub const PRIORITY_CRITICAL: u8 = 1;
pub const PRIORITY_RECOMMENDED: u8 = 2;
pub const PRIORITY_OPTIONAL: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationStep {
    pub priority: u8,
    pub category: StepCategory,
    pub title: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finding_id: Option<String>,
}

impl RemediationStep {
    pub fn new(
        priority: u8,
        category: StepCategory,
        title: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            category,
            title: title.into(),
            detail: detail.into(),
            commands: Vec::new(),
            target_notes: None,
            finding_id: None,
        }
    }

    #[must_use]
    pub fn commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands = commands.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn target_notes(mut self, notes: impl Into<String>) -> Self {
        self.target_notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn for_finding(mut self, finding_id: impl Into<String>) -> Self {
        self.finding_id = Some(finding_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_parsing_is_lenient_about_case() {
        assert_eq!(RecoveryTarget::parse("VM"), Some(RecoveryTarget::Vm));
        assert_eq!(RecoveryTarget::parse(" baremetal"), Some(RecoveryTarget::Baremetal));
        assert_eq!(RecoveryTarget::parse("cloud"), None);
    }

    #[test]
    fn step_omits_empty_optionals() {
        let step = RemediationStep::new(PRIORITY_OPTIONAL, StepCategory::Config, "t", "d");
        let json = serde_json::to_value(&step).unwrap_or_default();
        assert_eq!(json["category"], "Config");
        assert!(json.get("commands").is_none());
        assert!(json.get("findingId").is_none());

        let step = step.for_finding("HELM_UNTRACKED").target_notes("n");
        let json = serde_json::to_value(&step).unwrap_or_default();
        assert_eq!(json["findingId"], "HELM_UNTRACKED");
        assert_eq!(json["targetNotes"], "n");
    }
}
