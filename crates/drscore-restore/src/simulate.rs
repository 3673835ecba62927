use std::collections::{BTreeMap, BTreeSet};

use drscore_model::{
    BackupInventory, Inventory, PersistentVolume, PersistentVolumeClaim, RestoreSimNamespace,
    RestoreSimResult, parse_gib, qualified_name,
};
use tracing::debug;

use crate::coverage::resolve_coverage;

struct ClaimView<'a> {
    claim: &'a PersistentVolumeClaim,
    volume: Option<&'a PersistentVolume>,
}

/// Projects, per namespace holding a StatefulSet or a claim, whether a
/// restore is currently feasible.
///
/// Namespaces are emitted in lexical order and the totals are summed in that
/// order, so identical inputs give identical output.
pub fn simulate(inventory: &Inventory, backup: &BackupInventory) -> RestoreSimResult {
    let volumes = inventory.volumes_by_claim();
    let known_classes = inventory.storage_class_names();

    let mut claims_by_ns: BTreeMap<&str, Vec<ClaimView<'_>>> = BTreeMap::new();
    for claim in &inventory.pvcs {
        let key = qualified_name(&claim.namespace, &claim.name);
        claims_by_ns
            .entry(claim.namespace.as_str())
            .or_default()
            .push(ClaimView {
                claim,
                volume: volumes.get(key.as_str()).copied(),
            });
    }
    for claims in claims_by_ns.values_mut() {
        claims.sort_by(|a, b| a.claim.name.cmp(&b.claim.name));
    }

    let relevant: BTreeSet<&str> = inventory
        .stateful_sets
        .iter()
        .map(|sts| sts.namespace.as_str())
        .chain(claims_by_ns.keys().copied())
        .collect();

    let mut result = RestoreSimResult::default();
    for namespace in relevant {
        let coverage = resolve_coverage(backup, namespace);
        let mut record = RestoreSimNamespace {
            namespace: namespace.to_string(),
            has_coverage: coverage.covered,
            coverage_basis: coverage.basis,
            rpo_hours: coverage.best_rpo_hours,
            ..RestoreSimNamespace::default()
        };

        for view in claims_by_ns.get(namespace).into_iter().flatten() {
            inspect_claim(view, &known_classes, &mut record);
        }

        debug!(
            namespace,
            covered = record.has_coverage,
            basis = ?record.coverage_basis,
            size_gb = record.pvc_size_gb,
            blockers = record.blockers.len(),
            "simulated namespace restore"
        );

        result.total_pvcs_gb += record.pvc_size_gb;
        if record.has_coverage {
            result.covered_pvcs_gb += record.pvc_size_gb;
        } else {
            result.uncovered_namespaces.push(record.namespace.clone());
        }
        result.namespaces.push(record);
    }
    result
}

fn inspect_claim(
    view: &ClaimView<'_>,
    known_classes: &BTreeSet<&str>,
    record: &mut RestoreSimNamespace,
) {
    let claim = view.claim;
    record.pvc_size_gb += claim.requested_size.as_deref().map_or(0.0, parse_gib);

    match view.volume {
        None => record
            .blockers
            .push(format!("unbound PVC {}", claim.name)),
        Some(volume) if volume.is_node_local() => record.blockers.push(format!(
            "PVC {} uses node-local {} volume {}, not portable across nodes",
            claim.name,
            volume.backend.as_deref().unwrap_or_default(),
            volume.name
        )),
        Some(_) => {}
    }

    if let Some(class) = claim.storage_class_name() {
        if !known_classes.contains(class) {
            record.warnings.push(format!(
                "PVC {} references StorageClass '{class}' not present in cluster",
                claim.name
            ));
        }
    }
}
