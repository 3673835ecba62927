use drscore_core::estimate_rpo_hours;
use serde::{Deserialize, Serialize};

use crate::restore::RestoreSimResult;

/// `primaryTool` value when no backup solution was found.
pub const NO_BACKUP_TOOL: &str = "none";

/// One schedule/policy object reported by a backup tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupPolicy {
    pub tool: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_namespace: Option<String>,
    /// Empty means every namespace.
    pub included_namespaces: Vec<String>,
    pub excluded_namespaces: Vec<String>,
    pub schedule: String,
    #[serde(with = "crate::wire::rpo_hours")]
    pub rpo_hours: Option<u32>,
    #[serde(rename = "retentionTTL", skip_serializing_if = "Option::is_none")]
    pub retention_ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
    pub has_offsite: bool,
}

impl BackupPolicy {
    /// Policy covering every namespace on `schedule`, with the RPO estimated from it.
    pub fn scheduled(tool: impl Into<String>, name: impl Into<String>, schedule: &str) -> Self {
        Self {
            tool: tool.into(),
            name: name.into(),
            schedule: schedule.to_string(),
            rpo_hours: estimate_rpo_hours(schedule),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn including<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.included_namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn excluding<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_retention(&self) -> bool {
        self.retention_ttl
            .as_deref()
            .is_some_and(|ttl| !ttl.trim().is_empty())
    }

    /// Fills `rpo_hours` from the schedule when the detector left it unknown.
    /// Returns true when a value was filled in.
    pub fn backfill_rpo(&mut self) -> bool {
        if self.rpo_hours.is_some() {
            return false;
        }
        self.rpo_hours = estimate_rpo_hours(&self.schedule);
        self.rpo_hours.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectedTool {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub detected: bool,
    #[serde(rename = "crdsFound", skip_serializing_if = "Vec::is_empty")]
    pub crds_found: Vec<String>,
}

/// Backup detector output plus the restore simulation attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupInventory {
    pub tools: Vec<DetectedTool>,
    pub primary_tool: String,
    pub policies: Vec<BackupPolicy>,
    /// Tool-level coverage list used when no structured policies exist.
    /// A lone `"*"` means the tool was assumed to cover everything.
    pub covered_namespaces: Vec<String>,
    #[serde(rename = "uncoveredStatefulNamespaces")]
    pub uncovered_stateful_namespaces: Vec<String>,
    pub has_offsite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore_sim: Option<RestoreSimResult>,
}

impl Default for BackupInventory {
    fn default() -> Self {
        Self {
            tools: Vec::new(),
            primary_tool: NO_BACKUP_TOOL.to_string(),
            policies: Vec::new(),
            covered_namespaces: Vec::new(),
            uncovered_stateful_namespaces: Vec::new(),
            has_offsite: false,
            restore_sim: None,
        }
    }
}

impl BackupInventory {
    pub fn with_tool(tool: impl Into<String>) -> Self {
        Self {
            primary_tool: tool.into(),
            ..Self::default()
        }
    }

    pub fn tool_detected(&self) -> bool {
        let tool = self.primary_tool.trim();
        !tool.is_empty() && !tool.eq_ignore_ascii_case(NO_BACKUP_TOOL)
    }

    /// Lowercased primary tool name, `None` when nothing was detected.
    pub fn tool_name(&self) -> Option<String> {
        self.tool_detected()
            .then(|| self.primary_tool.trim().to_ascii_lowercase())
    }

    /// Promotes the first detected entry of `tools` when the detector left
    /// `primaryTool` unset. Returns true when the primary tool changed.
    pub fn resolve_primary_tool(&mut self) -> bool {
        if self.tool_detected() {
            return false;
        }
        let Some(tool) = self
            .tools
            .iter()
            .find(|tool| tool.detected && !tool.name.trim().is_empty())
        else {
            return false;
        };
        self.primary_tool = tool.name.trim().to_string();
        true
    }

    pub fn offsite_configured(&self) -> bool {
        self.has_offsite || self.policies.iter().any(|policy| policy.has_offsite)
    }

    pub fn assumes_wildcard_coverage(&self) -> bool {
        self.policies.is_empty() && self.covered_namespaces.iter().any(|ns| ns == "*")
    }

    /// Backfills every policy's RPO from its schedule; returns how many changed.
    pub fn backfill_rpo(&mut self) -> usize {
        self.policies
            .iter_mut()
            .map(BackupPolicy::backfill_rpo)
            .filter(|filled| *filled)
            .count()
    }
}
