use drscore::model::{
    BackupInventory, BackupPolicy, CoverageBasis, PersistentVolume, PersistentVolumeClaim,
    StatefulSet, StorageClass,
};
use drscore::{Inventory, Maturity, RecoveryTarget, RiskPosture, ScoringProfile, assess};

fn claim(namespace: &str, name: &str, size: &str) -> PersistentVolumeClaim {
    PersistentVolumeClaim {
        namespace: namespace.to_string(),
        name: name.to_string(),
        storage_class: Some("fast".to_string()),
        requested_size: Some(size.to_string()),
        ..PersistentVolumeClaim::default()
    }
}

fn csi_volume(name: &str, claim_ref: &str) -> PersistentVolume {
    PersistentVolume {
        name: name.to_string(),
        storage_class: Some("fast".to_string()),
        reclaim_policy: Some("Retain".to_string()),
        backend: Some("csi".to_string()),
        claim_ref: Some(claim_ref.to_string()),
        ..PersistentVolume::default()
    }
}

fn unprotected_cluster() -> Inventory {
    Inventory {
        pvcs: vec![PersistentVolumeClaim {
            namespace: "db".to_string(),
            name: "data-0".to_string(),
            requested_size: Some("10Gi".to_string()),
            ..PersistentVolumeClaim::default()
        }],
        stateful_sets: vec![
            StatefulSet {
                namespace: "db".to_string(),
                name: "pg".to_string(),
                replicas: 1,
                ..StatefulSet::default()
            },
            StatefulSet {
                namespace: "cache".to_string(),
                name: "redis".to_string(),
                replicas: 1,
                ..StatefulSet::default()
            },
        ],
        ..Inventory::default()
    }
}

fn partially_backed_up_cluster() -> Inventory {
    let mut policy = BackupPolicy::scheduled("velero", "daily", "0 2 * * *").including(["big"]);
    policy.retention_ttl = Some("720h0m0s".to_string());
    policy.rpo_hours = None;
    Inventory {
        storage_classes: vec![StorageClass {
            name: "fast".to_string(),
            provisioner: Some("ebs.csi.aws.com".to_string()),
            ..StorageClass::default()
        }],
        pvcs: vec![claim("big", "data", "100Gi"), claim("small", "data", "1Gi")],
        pvs: vec![csi_volume("pv-big", "big/data"), csi_volume("pv-small", "small/data")],
        backup: BackupInventory {
            has_offsite: true,
            policies: vec![policy],
            ..BackupInventory::with_tool("velero")
        },
        ..Inventory::default()
    }
}

#[test]
fn unprotected_cluster_scores_silver() {
    let report = assess(&unprotected_cluster(), ScoringProfile::Standard, RecoveryTarget::Vm);

    let ids: Vec<&str> = report.findings.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["PVC_UNBOUND", "PVC_NO_STORAGECLASS", "STS_NO_PVC", "STS_NO_PVC", "BACKUP_NONE"]
    );
    assert_eq!(report.score.storage.final_score, 65);
    assert_eq!(report.score.workload.final_score, 70);
    assert_eq!(report.score.config.final_score, 100);
    assert_eq!(report.score.backup.final_score, 40);
    assert_eq!(report.overall(), 64);
    assert_eq!(report.score.maturity, Maturity::Silver);
    assert_eq!(report.risk, RiskPosture::High);
    assert!(!report.passes(90));

    assert_eq!(report.finding_counts.total(), 5);
    assert_eq!(report.primary_tool, "none");
    assert_eq!(report.restore_sim.uncovered_namespaces, vec!["cache", "db"]);
    assert_eq!(
        report.inventory.workloads,
        vec!["cache/redis (StatefulSet)", "db/pg (StatefulSet)"]
    );
    assert_eq!(report.inventory.pvcs, vec!["db/data-0"]);
    assert!(
        report
            .restore_sim
            .namespace("db")
            .is_some_and(|ns| ns.blockers == vec!["unbound PVC data-0".to_string()])
    );

    let first = report.remediation.first();
    assert_eq!(first.map(|s| s.priority), Some(1));
    assert!(
        report
            .remediation
            .iter()
            .any(|s| s.finding_id.as_deref() == Some("BACKUP_NONE"))
    );
}

#[test]
fn assessment_is_idempotent() {
    let inventory = partially_backed_up_cluster();
    let first = assess(&inventory, ScoringProfile::Enterprise, RecoveryTarget::Baremetal);
    let second = assess(&inventory, ScoringProfile::Enterprise, RecoveryTarget::Baremetal);
    assert_eq!(first, second);

    let first_json = serde_json::to_string(&first).unwrap_or_default();
    let second_json = serde_json::to_string(&second).unwrap_or_default();
    assert!(!first_json.is_empty());
    assert_eq!(first_json, second_json);

    let policy = inventory.backup.policies.first();
    assert_eq!(policy.and_then(|p| p.rpo_hours), None, "input must not be mutated");
}

#[test]
fn coverage_is_weighted_by_claimed_volume() {
    let report = assess(
        &partially_backed_up_cluster(),
        ScoringProfile::Standard,
        RecoveryTarget::Vm,
    );
    let sim = &report.restore_sim;
    assert!((sim.total_pvcs_gb - 101.0).abs() < 1e-9);
    assert!((sim.covered_pvcs_gb - 100.0).abs() < 1e-9);
    assert!(sim.coverage_percent().is_some_and(|pct| (pct - 99.0099).abs() < 1e-3));
    assert_eq!(sim.uncovered_namespaces, vec!["small"]);

    let big = sim.namespace("big");
    assert_eq!(big.map(|ns| ns.coverage_basis), Some(CoverageBasis::Policy));
    assert_eq!(big.and_then(|ns| ns.rpo_hours), Some(24));

    let gap = report.findings.iter().find(|f| f.id == "RESTORE_COVERAGE_GAP");
    assert_eq!(gap.map(|f| f.resource_id.as_str()), Some("namespaces:small"));
    assert!(gap.is_some_and(|f| f.message.starts_with("Only 99.0% of claimed volume")));
    assert!(!report.findings.iter().any(|f| f.id == "BACKUP_NONE"));
}

#[test]
fn half_hourly_schedule_stays_within_a_day() {
    let mut inventory = partially_backed_up_cluster();
    for policy in &mut inventory.backup.policies {
        policy.schedule = "*/30 * * * *".to_string();
    }
    let report = assess(&inventory, ScoringProfile::Standard, RecoveryTarget::Vm);
    let big = report.restore_sim.namespace("big");
    assert_eq!(big.and_then(|ns| ns.rpo_hours), Some(24));
    assert!(!report.findings.iter().any(|f| f.id == "BACKUP_RPO_EXCEEDS_DAY"));
}

#[test]
fn report_json_uses_wire_names() {
    let report = assess(&unprotected_cluster(), ScoringProfile::Standard, RecoveryTarget::Vm);
    let json = serde_json::to_value(&report).unwrap_or_default();
    let overall = json.pointer("/score/overall/final");
    assert_eq!(overall, Some(&serde_json::json!(64)));
    assert_eq!(json.pointer("/score/maturity"), Some(&serde_json::json!("SILVER")));
    assert_eq!(json.pointer("/schemaVersion"), Some(&serde_json::json!("1.0")));
    assert_eq!(
        json.pointer("/restoreSim/namespaces/0/rpoHours"),
        Some(&serde_json::json!(-1))
    );
}
