use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use drscore_core::{RiskPosture, Score, ScoringProfile};
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::finding::{Finding, FindingCounts};
use crate::inventory::{Inventory, qualified_name};
use crate::remediation::{RecoveryTarget, RemediationStep};
use crate::restore::RestoreSimResult;

pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// Sorted identities of what the snapshot contained, kept so two reports can
/// be compared without their snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryKeys {
    pub namespaces: Vec<String>,
    /// `"<namespace>/<name> (<Kind>)"`
    pub workloads: Vec<String>,
    pub pvcs: Vec<String>,
    pub images: Vec<String>,
}

impl InventoryKeys {
    pub fn of(inventory: &Inventory) -> Self {
        let workload = |namespace: &str, name: &str, kind: &str| {
            format!("{} ({kind})", qualified_name(namespace, name))
        };
        let workloads = inventory
            .deployments
            .iter()
            .map(|w| workload(&w.namespace, &w.name, "Deployment"))
            .chain(
                inventory
                    .stateful_sets
                    .iter()
                    .map(|w| workload(&w.namespace, &w.name, "StatefulSet")),
            )
            .chain(
                inventory
                    .daemon_sets
                    .iter()
                    .map(|w| workload(&w.namespace, &w.name, "DaemonSet")),
            );

        Self {
            namespaces: sorted(inventory.namespaces.iter().map(|ns| ns.name.clone())),
            workloads: sorted(workloads),
            pvcs: sorted(
                inventory
                    .pvcs
                    .iter()
                    .map(|pvc| qualified_name(&pvc.namespace, &pvc.name)),
            ),
            images: sorted(inventory.images.iter().map(|img| img.image.clone())),
        }
    }
}

fn sorted(keys: impl Iterator<Item = String>) -> Vec<String> {
    keys.collect::<BTreeSet<_>>().into_iter().collect()
}

/// Everything one assessment pass produces, in its persisted JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub schema_version: String,
    pub profile: ScoringProfile,
    #[serde(default)]
    pub target: RecoveryTarget,
    pub primary_tool: String,
    pub score: Score,
    pub risk: RiskPosture,
    pub findings: Vec<Finding>,
    pub finding_counts: FindingCounts,
    pub restore_sim: RestoreSimResult,
    #[serde(default)]
    pub remediation: Vec<RemediationStep>,
    /// Absent in reports written before it was recorded.
    #[serde(default)]
    pub inventory: InventoryKeys,
}

impl AssessmentReport {
    pub const fn overall(&self) -> i32 {
        self.score.overall.final_score
    }

    /// Gate used by CI callers: the overall score meets `min_score`.
    pub const fn passes(&self, min_score: i32) -> bool {
        self.overall() >= min_score
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_json_slice(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(overall_inputs: (i32, i32, i32, i32)) -> AssessmentReport {
        let (s, w, c, b) = overall_inputs;
        let score = Score::from_domains(s, w, c, b);
        AssessmentReport {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            profile: ScoringProfile::Standard,
            target: RecoveryTarget::Vm,
            primary_tool: "none".to_string(),
            risk: RiskPosture::from_score(score.overall.final_score),
            score,
            findings: Vec::new(),
            finding_counts: FindingCounts::default(),
            restore_sim: RestoreSimResult::default(),
            remediation: Vec::new(),
            inventory: InventoryKeys::default(),
        }
    }

    #[test]
    fn gate_is_inclusive() {
        let report = sample((65, 70, 100, 40));
        assert_eq!(report.overall(), 64);
        assert!(report.passes(64));
        assert!(!report.passes(65));
    }

    #[test]
    fn report_reloads_from_its_own_json() {
        let report = sample((100, 100, 100, 100));
        let bytes = serde_json::to_vec(&report).unwrap_or_default();
        let reloaded = AssessmentReport::from_json_slice(&bytes).ok();
        assert_eq!(reloaded.as_ref(), Some(&report));

        let json = serde_json::to_value(&report).unwrap_or_default();
        assert_eq!(json["schemaVersion"], "1.0");
        assert_eq!(json["risk"], "LOW");
        assert_eq!(json["score"]["overall"]["final"], 100);
    }

    #[test]
    fn garbage_is_a_serde_error() {
        let err = AssessmentReport::from_json_slice(b"{not json").err();
        assert!(matches!(err, Some(SnapshotError::Serde(_))));
    }

    #[test]
    fn inventory_keys_are_sorted_and_unique() {
        use crate::inventory::{ContainerImage, Deployment, Namespace, StatefulSet};

        let inventory = Inventory {
            namespaces: vec![
                Namespace { name: "web".to_string() },
                Namespace { name: "db".to_string() },
            ],
            deployments: vec![Deployment {
                namespace: "web".to_string(),
                name: "shop".to_string(),
                ..Deployment::default()
            }],
            stateful_sets: vec![StatefulSet {
                namespace: "db".to_string(),
                name: "pg".to_string(),
                ..StatefulSet::default()
            }],
            images: ["nginx:1.27", "postgres:16", "nginx:1.27"]
                .into_iter()
                .map(|image| ContainerImage {
                    image: image.to_string(),
                    ..ContainerImage::default()
                })
                .collect(),
            ..Inventory::default()
        };
        let keys = InventoryKeys::of(&inventory);
        assert_eq!(keys.namespaces, vec!["db", "web"]);
        assert_eq!(keys.workloads, vec!["db/pg (StatefulSet)", "web/shop (Deployment)"]);
        assert!(keys.pvcs.is_empty());
        assert_eq!(keys.images, vec!["nginx:1.27", "postgres:16"]);
    }

    #[test]
    fn older_reports_load_without_inventory_keys() {
        let report = sample((90, 90, 90, 90));
        let mut json = serde_json::to_value(&report).unwrap_or_default();
        if let Some(obj) = json.as_object_mut() {
            obj.remove("inventory");
        }
        let bytes = serde_json::to_vec(&json).unwrap_or_default();
        let reloaded = AssessmentReport::from_json_slice(&bytes)
            .unwrap_or_else(|e| panic!("reload failed: {e}"));
        assert_eq!(reloaded.inventory, InventoryKeys::default());
    }
}
