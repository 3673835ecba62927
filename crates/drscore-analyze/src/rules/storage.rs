use drscore_model::qualified_name;

use crate::context::RuleContext;
use crate::rule::Offense;

pub fn pvc_unbound(ctx: &RuleContext<'_>) -> Vec<Offense> {
    ctx.inventory
        .pvcs
        .iter()
        .filter(|pvc| ctx.volume_for(pvc).is_none())
        .map(|pvc| Offense::new(qualified_name(&pvc.namespace, &pvc.name)))
        .collect()
}

pub fn pvc_no_storage_class(ctx: &RuleContext<'_>) -> Vec<Offense> {
    ctx.inventory
        .pvcs
        .iter()
        .filter(|pvc| pvc.storage_class_name().is_none())
        .map(|pvc| Offense::new(qualified_name(&pvc.namespace, &pvc.name)))
        .collect()
}

pub fn pv_host_path(ctx: &RuleContext<'_>) -> Vec<Offense> {
    ctx.inventory
        .pvcs
        .iter()
        .filter_map(|pvc| ctx.volume_for(pvc))
        .filter(|pv| pv.is_host_path())
        .map(|pv| Offense::new(pv.name.as_str()))
        .collect()
}

pub fn pv_delete_policy(ctx: &RuleContext<'_>) -> Vec<Offense> {
    ctx.inventory
        .pvcs
        .iter()
        .filter_map(|pvc| ctx.volume_for(pvc))
        .filter(|pv| pv.deletes_on_release())
        .map(|pv| Offense::new(pv.name.as_str()))
        .collect()
}

pub fn pv_orphan(ctx: &RuleContext<'_>) -> Vec<Offense> {
    ctx.inventory
        .pvs
        .iter()
        .filter(|pv| pv.is_orphaned())
        .map(|pv| Offense::new(pv.name.as_str()))
        .collect()
}

/// Only meaningful once storage classes were collected at all.
pub fn pvc_unknown_storage_class(ctx: &RuleContext<'_>) -> Vec<Offense> {
    if ctx.inventory.storage_classes.is_empty() {
        return Vec::new();
    }
    let known = ctx.inventory.storage_class_names();
    ctx.inventory
        .pvcs
        .iter()
        .filter_map(|pvc| {
            let class = pvc.storage_class_name()?;
            (!known.contains(class)).then(|| {
                Offense::new(qualified_name(&pvc.namespace, &pvc.name)).with_message(format!(
                    "PVC references StorageClass '{class}' which does not exist in the cluster"
                ))
            })
        })
        .collect()
}

pub fn storage_class_no_default(ctx: &RuleContext<'_>) -> Vec<Offense> {
    let classes = &ctx.inventory.storage_classes;
    if classes.is_empty() || classes.iter().any(|sc| sc.is_default()) {
        return Vec::new();
    }
    vec![Offense::new("storageclasses")]
}
