use std::collections::{BTreeMap, BTreeSet};

use drscore_model::{
    BackupInventory, Inventory, PersistentVolume, PersistentVolumeClaim, RestoreSimResult,
    qualified_name,
};

/// Read-only view shared by every rule check in one evaluation pass.
pub struct RuleContext<'a> {
    pub inventory: &'a Inventory,
    pub backup: &'a BackupInventory,
    pub sim: &'a RestoreSimResult,
    volumes: BTreeMap<&'a str, &'a PersistentVolume>,
}

impl<'a> RuleContext<'a> {
    pub fn new(inventory: &'a Inventory, sim: &'a RestoreSimResult) -> Self {
        Self {
            inventory,
            backup: &inventory.backup,
            sim,
            volumes: inventory.volumes_by_claim(),
        }
    }

    /// The volume bound to `claim`, if any.
    pub fn volume_for(&self, claim: &PersistentVolumeClaim) -> Option<&'a PersistentVolume> {
        self.volumes
            .get(qualified_name(&claim.namespace, &claim.name).as_str())
            .copied()
    }

    pub fn tool_detected(&self) -> bool {
        self.backup.tool_detected()
    }

    pub fn namespaces_with_pods(&self) -> BTreeSet<&'a str> {
        self.inventory
            .pods
            .iter()
            .map(|pod| pod.namespace.as_str())
            .collect()
    }
}
