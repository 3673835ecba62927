use drscore_core::{Domain, PenaltyCategory};
use drscore_model::Severity;

use crate::rule::Rule;
use crate::rules::{backup, config, storage, workload};

/// Rule whose penalty bounds the combined `tool_gap` deductions.
pub const NO_TOOL_RULE: &str = "BACKUP_NONE";

/// Every rule, in evaluation order. Findings come out in this order.
static CATALOG: [Rule; 42] = [
    // storage
    Rule {
        id: "PVC_UNBOUND",
        domain: Domain::Storage,
        severity: Severity::Critical,
        penalty: 25,
        category: None,
        message: "PVC is not bound to a PV",
        recommendation: "Investigate binding failure before DR onboarding",
        check: storage::pvc_unbound,
        tool_gap: false,
    },
    Rule {
        id: "PVC_NO_STORAGECLASS",
        domain: Domain::Storage,
        severity: Severity::High,
        penalty: 10,
        category: None,
        message: "PVC has no storageClass",
        recommendation: "Define explicit storageClass for DR predictability",
        check: storage::pvc_no_storage_class,
        tool_gap: false,
    },
    Rule {
        id: "PV_HOSTPATH",
        domain: Domain::Storage,
        severity: Severity::Critical,
        penalty: 30,
        category: None,
        message: "PV uses hostPath storage",
        recommendation: "Migrate to CSI/network storage before DR onboarding",
        check: storage::pv_host_path,
        tool_gap: false,
    },
    Rule {
        id: "PV_DELETE_POLICY",
        domain: Domain::Storage,
        severity: Severity::High,
        penalty: 15,
        category: Some(PenaltyCategory::Immutability),
        message: "PV reclaimPolicy is Delete",
        recommendation: "Consider Retain for DR recoverability",
        check: storage::pv_delete_policy,
        tool_gap: false,
    },
    Rule {
        id: "PV_ORPHAN",
        domain: Domain::Storage,
        severity: Severity::Medium,
        penalty: 5,
        category: None,
        message: "PV is not bound to any PVC",
        recommendation: "Validate if orphaned storage should be cleaned up",
        check: storage::pv_orphan,
        tool_gap: false,
    },
    Rule {
        id: "PVC_UNKNOWN_STORAGECLASS",
        domain: Domain::Storage,
        severity: Severity::Medium,
        penalty: 5,
        category: None,
        message: "PVC references a StorageClass that does not exist",
        recommendation: "Create the StorageClass or update the claim before DR onboarding",
        check: storage::pvc_unknown_storage_class,
        tool_gap: false,
    },
    Rule {
        id: "STORAGECLASS_NO_DEFAULT",
        domain: Domain::Storage,
        severity: Severity::Medium,
        penalty: 5,
        category: None,
        message: "No default StorageClass is configured",
        recommendation: "Mark one StorageClass as default so claims without a class can bind after restore",
        check: storage::storage_class_no_default,
        tool_gap: false,
    },
    // config
    Rule {
        id: "POD_HOSTPATH",
        domain: Domain::Config,
        severity: Severity::Critical,
        penalty: 10,
        category: Some(PenaltyCategory::Security),
        message: "Pod uses hostPath volume",
        recommendation: "Replace hostPath with CSI-backed persistent storage",
        check: config::pod_host_path,
        tool_gap: false,
    },
    Rule {
        id: "POD_PRIVILEGED",
        domain: Domain::Config,
        severity: Severity::High,
        penalty: 10,
        category: Some(PenaltyCategory::Security),
        message: "Pod runs a privileged container",
        recommendation: "Drop privileged mode and grant only the capabilities the workload needs",
        check: config::pod_privileged,
        tool_gap: false,
    },
    Rule {
        id: "POD_HOST_NAMESPACE",
        domain: Domain::Config,
        severity: Severity::Medium,
        penalty: 5,
        category: Some(PenaltyCategory::Security),
        message: "Pod shares the host network or PID namespace",
        recommendation: "Avoid hostNetwork/hostPID for application workloads",
        check: config::pod_host_namespace,
        tool_gap: false,
    },
    Rule {
        id: "POD_NO_RESOURCE_REQUESTS",
        domain: Domain::Config,
        severity: Severity::Low,
        penalty: 3,
        category: None,
        message: "Pods run without CPU/memory requests",
        recommendation: "Set resource requests so workloads schedule predictably on recovery capacity",
        check: config::pod_no_resource_requests,
        tool_gap: false,
    },
    Rule {
        id: "NAMESPACE_NO_NETWORKPOLICY",
        domain: Domain::Config,
        severity: Severity::Medium,
        penalty: 10,
        category: Some(PenaltyCategory::Security),
        message: "Namespaces have no NetworkPolicy",
        recommendation: "Add a default-deny NetworkPolicy and allow only required traffic",
        check: config::namespace_no_network_policy,
        tool_gap: false,
    },
    Rule {
        id: "NAMESPACE_NO_LIMITRANGE",
        domain: Domain::Config,
        severity: Severity::Low,
        penalty: 3,
        category: None,
        message: "Namespaces have no LimitRange",
        recommendation: "Define LimitRanges so restored workloads cannot exhaust node resources",
        check: config::namespace_no_limit_range,
        tool_gap: false,
    },
    Rule {
        id: "RBAC_WILDCARD_VERB",
        domain: Domain::Config,
        severity: Severity::High,
        penalty: 10,
        category: Some(PenaltyCategory::Security),
        message: "Custom ClusterRoles grant wildcard verbs",
        recommendation: "Replace '*' verbs with the explicit verbs each role needs",
        check: config::rbac_wildcard_verb,
        tool_gap: false,
    },
    Rule {
        id: "RBAC_SECRET_ACCESS",
        domain: Domain::Config,
        severity: Severity::Medium,
        penalty: 5,
        category: Some(PenaltyCategory::Security),
        message: "Custom ClusterRoles can read Secrets cluster-wide",
        recommendation: "Scope Secret access to namespaced Roles",
        check: config::rbac_secret_access,
        tool_gap: false,
    },
    Rule {
        id: "RBAC_ESCALATION",
        domain: Domain::Config,
        severity: Severity::High,
        penalty: 10,
        category: Some(PenaltyCategory::Security),
        message: "Custom ClusterRoles allow escalate, bind or impersonate",
        recommendation: "Remove privilege-escalation verbs from custom roles",
        check: config::rbac_escalation,
        tool_gap: false,
    },
    Rule {
        id: "RBAC_CLUSTER_ADMIN_BINDING",
        domain: Domain::Config,
        severity: Severity::High,
        penalty: 10,
        category: Some(PenaltyCategory::Security),
        message: "cluster-admin is bound to non-system subjects",
        recommendation: "Bind narrower roles and keep cluster-admin for break-glass accounts",
        check: config::rbac_cluster_admin_binding,
        tool_gap: false,
    },
    Rule {
        id: "SA_TOKEN_AUTOMOUNT",
        domain: Domain::Config,
        severity: Severity::Low,
        penalty: 2,
        category: Some(PenaltyCategory::Security),
        message: "Pods automount service account tokens",
        recommendation: "Set automountServiceAccountToken: false where the API is not used",
        check: config::sa_token_automount,
        tool_gap: false,
    },
    Rule {
        id: "INGRESS_NO_TLS",
        domain: Domain::Config,
        severity: Severity::Low,
        penalty: 3,
        category: Some(PenaltyCategory::Security),
        message: "Ingress serves traffic without TLS",
        recommendation: "Terminate TLS on the Ingress and include certificates in DR backups",
        check: config::ingress_no_tls,
        tool_gap: false,
    },
    // workload
    Rule {
        id: "STS_NO_PVC",
        domain: Domain::Workload,
        severity: Severity::High,
        penalty: 15,
        category: None,
        message: "StatefulSet has no volumeClaimTemplate",
        recommendation: "Stateful workloads should use persistent storage",
        check: workload::sts_no_pvc,
        tool_gap: false,
    },
    Rule {
        id: "STS_SINGLE_REPLICA",
        domain: Domain::Workload,
        severity: Severity::Medium,
        penalty: 5,
        category: Some(PenaltyCategory::Replication),
        message: "StatefulSet runs a single replica",
        recommendation: "Run stateful workloads with replication where the application supports it",
        check: workload::sts_single_replica,
        tool_gap: false,
    },
    Rule {
        id: "STS_NO_PDB",
        domain: Domain::Workload,
        severity: Severity::Low,
        penalty: 3,
        category: Some(PenaltyCategory::Replication),
        message: "Replicated StatefulSet has no PodDisruptionBudget",
        recommendation: "Add a PodDisruptionBudget to protect quorum during node drains",
        check: workload::sts_no_pdb,
        tool_gap: false,
    },
    Rule {
        id: "DEPLOYMENT_SINGLE_REPLICA",
        domain: Domain::Workload,
        severity: Severity::Low,
        penalty: 3,
        category: Some(PenaltyCategory::Replication),
        message: "Deployments run a single replica",
        recommendation: "Scale critical Deployments to at least two replicas",
        check: workload::deployment_single_replica,
        tool_gap: false,
    },
    Rule {
        id: "WORKLOAD_UNAVAILABLE",
        domain: Domain::Workload,
        severity: Severity::Medium,
        penalty: 5,
        category: None,
        message: "Workload is not fully available",
        recommendation: "Resolve unavailable replicas before relying on this workload for DR",
        check: workload::workload_unavailable,
        tool_gap: false,
    },
    Rule {
        id: "NODE_NOT_READY",
        domain: Domain::Workload,
        severity: Severity::High,
        penalty: 10,
        category: None,
        message: "Node is not Ready",
        recommendation: "Investigate node health before DR onboarding",
        check: workload::node_not_ready,
        tool_gap: false,
    },
    Rule {
        id: "CONTROL_PLANE_SINGLE",
        domain: Domain::Workload,
        severity: Severity::High,
        penalty: 10,
        category: Some(PenaltyCategory::Replication),
        message: "Cluster has a single control-plane node",
        recommendation: "Run at least three control-plane nodes or keep verified etcd snapshots",
        check: workload::control_plane_single,
        tool_gap: false,
    },
    // backup
    Rule {
        id: "BACKUP_NONE",
        domain: Domain::Backup,
        severity: Severity::Critical,
        penalty: 60,
        category: None,
        message: "No backup tool detected in cluster",
        recommendation: "Install a backup solution (Kasten K10, Velero, Rubrik, Longhorn) before DR onboarding",
        check: backup::backup_none,
        tool_gap: false,
    },
    Rule {
        id: "BACKUP_NO_POLICIES",
        domain: Domain::Backup,
        severity: Severity::High,
        penalty: 30,
        category: None,
        message: "Backup tool detected but no backup policies or schedules found",
        recommendation: "Create backup schedules covering all production namespaces",
        check: backup::backup_no_policies,
        tool_gap: true,
    },
    Rule {
        id: "BACKUP_PARTIAL_COVERAGE",
        domain: Domain::Backup,
        severity: Severity::High,
        penalty: 20,
        category: None,
        message: "StatefulSets found in namespaces not covered by backup policy",
        recommendation: "Extend backup policies to cover all stateful namespaces",
        check: backup::backup_partial_coverage,
        tool_gap: true,
    },
    Rule {
        id: "RESTORE_COVERAGE_GAP",
        domain: Domain::Backup,
        severity: Severity::High,
        penalty: 15,
        category: Some(PenaltyCategory::RestoreTesting),
        message: "Claimed volume in some namespaces cannot be restored from backup",
        recommendation: "Cover the listed namespaces and verify with a test restore",
        check: backup::restore_coverage_gap,
        tool_gap: true,
    },
    Rule {
        id: "RESTORE_BLOCKED",
        domain: Domain::Backup,
        severity: Severity::High,
        penalty: 10,
        category: Some(PenaltyCategory::RestoreTesting),
        message: "Namespace restore is blocked",
        recommendation: "Resolve unbound claims and node-local volumes before relying on restore",
        check: backup::restore_blocked,
        tool_gap: true,
    },
    Rule {
        id: "BACKUP_ASSUMED_COVERAGE",
        domain: Domain::Backup,
        severity: Severity::Info,
        penalty: 0,
        category: None,
        message: "Backup tool policies could not be read; coverage of every namespace is assumed",
        recommendation: "Verify the tool's policies cover each stateful namespace",
        check: backup::backup_assumed_coverage,
        tool_gap: true,
    },
    Rule {
        id: "BACKUP_NO_OFFSITE",
        domain: Domain::Backup,
        severity: Severity::High,
        penalty: 15,
        category: Some(PenaltyCategory::Immutability),
        message: "No backup policy exports to an offsite location",
        recommendation: "Configure an offsite or object-storage backup location",
        check: backup::backup_no_offsite,
        tool_gap: true,
    },
    Rule {
        id: "BACKUP_RPO_EXCEEDS_DAY",
        domain: Domain::Backup,
        severity: Severity::Medium,
        penalty: 10,
        category: None,
        message: "Best achievable RPO exceeds 24 hours",
        recommendation: "Schedule backups at least daily for stateful namespaces",
        check: backup::backup_rpo_exceeds_day,
        tool_gap: true,
    },
    Rule {
        id: "BACKUP_RPO_UNKNOWN",
        domain: Domain::Backup,
        severity: Severity::Low,
        penalty: 3,
        category: None,
        message: "Backup policies have a schedule with no estimable RPO",
        recommendation: "Use a cron schedule or frequency label the RPO can be derived from",
        check: backup::backup_rpo_unknown,
        tool_gap: true,
    },
    Rule {
        id: "BACKUP_NO_RETENTION",
        domain: Domain::Backup,
        severity: Severity::Low,
        penalty: 3,
        category: Some(PenaltyCategory::Immutability),
        message: "Backup policies have no retention configured",
        recommendation: "Set an explicit retention/TTL on every backup policy",
        check: backup::backup_no_retention,
        tool_gap: true,
    },
    Rule {
        id: "SNAPSHOT_CLASS_NONE",
        domain: Domain::Backup,
        severity: Severity::Medium,
        penalty: 5,
        category: Some(PenaltyCategory::Replication),
        message: "No VolumeSnapshotClass available for CSI snapshots",
        recommendation: "Install a VolumeSnapshotClass for the CSI driver backing persistent volumes",
        check: backup::snapshot_class_none,
        tool_gap: true,
    },
    Rule {
        id: "ETCD_BACKUP_MISSING",
        domain: Domain::Backup,
        severity: Severity::High,
        penalty: 15,
        category: Some(PenaltyCategory::RestoreTesting),
        message: "No etcd backup mechanism detected",
        recommendation: "Schedule etcd snapshots and store them off-cluster",
        check: backup::etcd_backup_missing,
        tool_gap: false,
    },
    Rule {
        id: "CRD_NO_BACKUP",
        domain: Domain::Backup,
        severity: Severity::Medium,
        penalty: 10,
        category: None,
        message: "Custom Resource Definitions present but no backup tool detected",
        recommendation: "Ensure backup solution captures CRD definitions and CR data",
        check: backup::crd_no_backup,
        tool_gap: false,
    },
    Rule {
        id: "CERT_EXPIRING_SOON",
        domain: Domain::Backup,
        severity: Severity::High,
        penalty: 10,
        category: None,
        message: "Certificate expires within 30 days",
        recommendation: "Renew certificate before DR event window",
        check: backup::cert_expiring_soon,
        tool_gap: false,
    },
    Rule {
        id: "IMAGE_EXTERNAL_REGISTRY",
        domain: Domain::Backup,
        severity: Severity::Medium,
        penalty: 5,
        category: Some(PenaltyCategory::Airgap),
        message: "Workloads depend on public container registries",
        recommendation: "Mirror critical images to a private registry accessible from the DR environment",
        check: backup::image_external_registry,
        tool_gap: false,
    },
    Rule {
        id: "HELM_UNTRACKED",
        domain: Domain::Backup,
        severity: Severity::Low,
        penalty: 5,
        category: None,
        message: "Helm releases detected with no backup tool to capture release values",
        recommendation: "Back up Helm values (helm get values <release>) for each release before DR",
        check: backup::helm_untracked,
        tool_gap: false,
    },
];

pub fn catalog() -> &'static [Rule] {
    &CATALOG
}

pub fn rule(id: &str) -> Option<&'static Rule> {
    CATALOG.iter().find(|rule| rule.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn rule_ids_are_unique() {
        let ids: BTreeSet<&str> = catalog().iter().map(|rule| rule.id).collect();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn rules_are_grouped_by_domain_in_scoring_order() {
        let mut seen: Vec<Domain> = Vec::new();
        for rule in catalog() {
            if seen.last() != Some(&rule.domain) {
                assert!(!seen.contains(&rule.domain), "{} breaks grouping", rule.id);
                seen.push(rule.domain);
            }
        }
        assert_eq!(
            seen,
            vec![Domain::Storage, Domain::Config, Domain::Workload, Domain::Backup]
        );
    }

    #[test]
    fn penalties_match_the_published_table() {
        let expected = [
            ("PVC_UNBOUND", 25),
            ("PVC_NO_STORAGECLASS", 10),
            ("PV_HOSTPATH", 30),
            ("PV_DELETE_POLICY", 15),
            ("PV_ORPHAN", 5),
            ("STS_NO_PVC", 15),
            ("BACKUP_NONE", 60),
            ("BACKUP_NO_POLICIES", 30),
            ("BACKUP_PARTIAL_COVERAGE", 20),
            ("BACKUP_NO_OFFSITE", 15),
            ("CRD_NO_BACKUP", 10),
            ("CERT_EXPIRING_SOON", 10),
            ("IMAGE_EXTERNAL_REGISTRY", 5),
            ("HELM_UNTRACKED", 5),
        ];
        for (id, penalty) in expected {
            assert_eq!(rule(id).map(|r| r.penalty), Some(penalty), "{id}");
        }
    }

    #[test]
    fn tool_gap_rules_are_backup_rules_gated_on_a_tool() {
        let gaps: Vec<&str> = catalog()
            .iter()
            .filter(|rule| rule.tool_gap)
            .map(|rule| rule.id)
            .collect();
        assert_eq!(gaps.len(), 10);
        assert!(!gaps.contains(&NO_TOOL_RULE));
        assert!(gaps.contains(&"BACKUP_NO_POLICIES"));
        assert!(gaps.contains(&"RESTORE_BLOCKED"));
        assert!(
            catalog()
                .iter()
                .filter(|rule| rule.tool_gap)
                .all(|rule| rule.domain == Domain::Backup)
        );
    }

    #[test]
    fn informational_rules_carry_no_penalty() {
        for rule in catalog() {
            assert_eq!(rule.severity == Severity::Info, rule.penalty == 0, "{}", rule.id);
        }
    }
}
