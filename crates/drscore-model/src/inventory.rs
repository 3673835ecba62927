use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backup::BackupInventory;
use crate::error::SnapshotError;

/// Namespaces owned by the control plane. Some rules report these as
/// informational instead of penalising them.
pub const SYSTEM_NAMESPACES: [&str; 3] = ["kube-system", "kube-public", "kube-node-lease"];

pub fn is_system_namespace(namespace: &str) -> bool {
    SYSTEM_NAMESPACES.contains(&namespace)
}

/// `"<namespace>/<name>"`, the identity used by findings and volume claim refs.
pub fn qualified_name(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}

/// Point-in-time cluster inventory as handed over by the collectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Inventory {
    /// Managed platform identifier when known, e.g. `EKS`, `AKS`, `GKE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub namespaces: Vec<Namespace>,
    pub nodes: Vec<Node>,
    pub pvcs: Vec<PersistentVolumeClaim>,
    pub pvs: Vec<PersistentVolume>,
    pub storage_classes: Vec<StorageClass>,
    pub volume_snapshot_classes: Vec<VolumeSnapshotClass>,
    pub stateful_sets: Vec<StatefulSet>,
    pub deployments: Vec<Deployment>,
    pub daemon_sets: Vec<DaemonSet>,
    pub pods: Vec<Pod>,
    pub pod_disruption_budgets: Vec<PodDisruptionBudget>,
    pub cluster_roles: Vec<ClusterRole>,
    pub cluster_role_bindings: Vec<ClusterRoleBinding>,
    pub network_policies: Vec<NetworkPolicy>,
    pub limit_ranges: Vec<LimitRange>,
    pub ingresses: Vec<Ingress>,
    pub crds: Vec<CustomResourceDefinition>,
    pub helm_releases: Vec<HelmRelease>,
    pub images: Vec<ContainerImage>,
    pub certificates: Vec<Certificate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etcd_backup: Option<EtcdBackupEvidence>,
    pub backup: BackupInventory,
}

impl Inventory {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_json_slice(&bytes)
    }

    /// Persistent volumes keyed by the `"<namespace>/<claim>"` they are bound to.
    pub fn volumes_by_claim(&self) -> BTreeMap<&str, &PersistentVolume> {
        self.pvs
            .iter()
            .filter_map(|pv| pv.claim_ref.as_deref().map(|claim| (claim, pv)))
            .collect()
    }

    pub fn storage_class_names(&self) -> BTreeSet<&str> {
        self.storage_classes.iter().map(|sc| sc.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Namespace {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Node {
    pub name: String,
    pub roles: Vec<String>,
    pub ready: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            name: String::new(),
            roles: Vec::new(),
            ready: true,
        }
    }
}

impl Node {
    pub fn is_control_plane(&self) -> bool {
        self.roles
            .iter()
            .any(|role| matches!(role.as_str(), "control-plane" | "master"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistentVolumeClaim {
    pub namespace: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    pub access_modes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_size: Option<String>,
}

impl PersistentVolumeClaim {
    /// Explicit, non-blank storage class name.
    pub fn storage_class_name(&self) -> Option<&str> {
        self.storage_class
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistentVolume {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reclaim_policy: Option<String>,
    /// Volume source kind, e.g. `csi`, `nfs`, `hostPath`, `local`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_ref: Option<String>,
}

const NODE_LOCAL_BACKENDS: [&str; 3] = ["hostpath", "local", "emptydir"];

impl PersistentVolume {
    pub fn is_host_path(&self) -> bool {
        self.backend
            .as_deref()
            .is_some_and(|backend| backend.eq_ignore_ascii_case("hostPath"))
    }

    /// Backed by storage that lives and dies with a single node.
    pub fn is_node_local(&self) -> bool {
        self.backend.as_deref().is_some_and(|backend| {
            NODE_LOCAL_BACKENDS.contains(&backend.to_ascii_lowercase().as_str())
        })
    }

    pub fn deletes_on_release(&self) -> bool {
        self.reclaim_policy
            .as_deref()
            .is_some_and(|policy| policy.eq_ignore_ascii_case("Delete"))
    }

    pub fn is_orphaned(&self) -> bool {
        self.claim_ref.as_deref().is_none_or(|claim| claim.trim().is_empty())
    }
}

const DEFAULT_CLASS_ANNOTATIONS: [&str; 2] = [
    "storageclass.kubernetes.io/is-default-class",
    "storageclass.beta.kubernetes.io/is-default-class",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageClass {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reclaim_policy: Option<String>,
    pub annotations: BTreeMap<String, String>,
}

impl StorageClass {
    pub fn is_default(&self) -> bool {
        DEFAULT_CLASS_ANNOTATIONS.iter().any(|key| {
            self.annotations
                .get(*key)
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeSnapshotClass {
    pub name: String,
    pub driver: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatefulSet {
    pub namespace: String,
    pub name: String,
    /// Kubernetes treats an unset `spec.replicas` as 1.
    pub replicas: i32,
    pub has_volume_claim: bool,
}

impl Default for StatefulSet {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            name: String::new(),
            replicas: 1,
            has_volume_claim: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Deployment {
    pub namespace: String,
    pub name: String,
    pub replicas: i32,
    pub ready: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DaemonSet {
    pub namespace: String,
    pub name: String,
    pub desired: i32,
    pub ready: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pod {
    pub namespace: String,
    pub name: String,
    pub uses_host_path: bool,
    /// Every container declares CPU and memory requests.
    pub has_requests: bool,
    pub privileged: bool,
    pub host_network: bool,
    pub host_pid: bool,
    #[serde(rename = "automountSaToken")]
    pub automount_sa_token: bool,
}

impl Default for Pod {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            name: String::new(),
            uses_host_path: false,
            // absence of the field is not evidence of missing requests
            has_requests: true,
            privileged: false,
            host_network: false,
            host_pid: false,
            automount_sa_token: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodDisruptionBudget {
    pub namespace: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterRole {
    pub name: String,
    /// Not one of the built-in `system:` roles.
    pub custom: bool,
    pub has_wildcard_verb: bool,
    pub has_secret_access: bool,
    /// Grants escalate, bind or impersonate.
    pub has_escalate_priv: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterRoleBinding {
    pub name: String,
    pub role_name: String,
    /// `"<kind>:<name>"` entries.
    pub subjects: Vec<String>,
}

impl ClusterRoleBinding {
    /// Subjects that are not control-plane identities.
    pub fn non_system_subjects(&self) -> impl Iterator<Item = &str> {
        self.subjects.iter().map(String::as_str).filter(|subject| {
            let name = subject.split_once(':').map_or(*subject, |(_, name)| name);
            !name.starts_with("system:")
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkPolicy {
    pub namespace: String,
    pub name: String,
    pub has_ingress: bool,
    pub has_egress: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LimitRange {
    pub namespace: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ingress {
    pub namespace: String,
    pub name: String,
    pub tls: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomResourceDefinition {
    pub name: String,
    pub group: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HelmRelease {
    pub namespace: String,
    pub name: String,
    pub chart: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerImage {
    pub image: String,
    pub registry: String,
    pub is_public: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certificate {
    pub namespace: String,
    pub name: String,
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_to_expiry: Option<i32>,
}

impl Certificate {
    pub fn expires_within(&self, days: i32) -> bool {
        self.days_to_expiry
            .is_some_and(|remaining| (0..=days).contains(&remaining))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EtcdBackupEvidence {
    pub detected: bool,
    /// `cronjob`, `velero-cluster-backup`, `provider-managed` or `none`.
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
