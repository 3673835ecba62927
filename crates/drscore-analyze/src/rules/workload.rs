use std::collections::BTreeSet;

use drscore_model::{is_system_namespace, qualified_name};

use crate::context::RuleContext;
use crate::rule::Offense;
use crate::summary::aggregate_id;

pub fn sts_no_pvc(ctx: &RuleContext<'_>) -> Vec<Offense> {
    ctx.inventory
        .stateful_sets
        .iter()
        .filter(|sts| !sts.has_volume_claim)
        .map(|sts| Offense::new(qualified_name(&sts.namespace, &sts.name)))
        .collect()
}

/// Single-replica StatefulSets with persistent storage. Those without a
/// volume claim are already reported by `STS_NO_PVC`.
pub fn sts_single_replica(ctx: &RuleContext<'_>) -> Vec<Offense> {
    ctx.inventory
        .stateful_sets
        .iter()
        .filter(|sts| sts.replicas == 1 && sts.has_volume_claim)
        .map(|sts| Offense::new(qualified_name(&sts.namespace, &sts.name)))
        .collect()
}

/// Multi-replica StatefulSets whose namespace has no PodDisruptionBudget.
pub fn sts_no_pdb(ctx: &RuleContext<'_>) -> Vec<Offense> {
    let guarded: BTreeSet<&str> = ctx
        .inventory
        .pod_disruption_budgets
        .iter()
        .map(|pdb| pdb.namespace.as_str())
        .collect();
    ctx.inventory
        .stateful_sets
        .iter()
        .filter(|sts| sts.replicas > 1 && !guarded.contains(sts.namespace.as_str()))
        .map(|sts| Offense::new(qualified_name(&sts.namespace, &sts.name)))
        .collect()
}

pub fn deployment_single_replica(ctx: &RuleContext<'_>) -> Vec<Offense> {
    let names: Vec<String> = ctx
        .inventory
        .deployments
        .iter()
        .filter(|deploy| deploy.replicas == 1 && !is_system_namespace(&deploy.namespace))
        .map(|deploy| qualified_name(&deploy.namespace, &deploy.name))
        .collect();
    if names.is_empty() {
        return Vec::new();
    }
    vec![
        Offense::new(aggregate_id("deployments", names.iter().map(String::as_str)))
            .with_message(format!("{} Deployment(s) run a single replica", names.len())),
    ]
}

pub fn workload_unavailable(ctx: &RuleContext<'_>) -> Vec<Offense> {
    let deployments = ctx
        .inventory
        .deployments
        .iter()
        .filter(|deploy| deploy.replicas > 0 && deploy.ready < deploy.replicas)
        .map(|deploy| {
            Offense::new(qualified_name(&deploy.namespace, &deploy.name)).with_message(format!(
                "Deployment has {}/{} replicas ready",
                deploy.ready, deploy.replicas
            ))
        });
    let daemon_sets = ctx
        .inventory
        .daemon_sets
        .iter()
        .filter(|ds| ds.desired > 0 && ds.ready < ds.desired)
        .map(|ds| {
            Offense::new(qualified_name(&ds.namespace, &ds.name)).with_message(format!(
                "DaemonSet has {}/{} pods ready",
                ds.ready, ds.desired
            ))
        });
    deployments.chain(daemon_sets).collect()
}

pub fn node_not_ready(ctx: &RuleContext<'_>) -> Vec<Offense> {
    ctx.inventory
        .nodes
        .iter()
        .filter(|node| !node.ready)
        .map(|node| Offense::new(node.name.as_str()))
        .collect()
}

/// Exactly one visible control-plane node. Managed platforms that hide the
/// control plane report none and are not flagged.
pub fn control_plane_single(ctx: &RuleContext<'_>) -> Vec<Offense> {
    let mut control_plane = ctx.inventory.nodes.iter().filter(|node| node.is_control_plane());
    match (control_plane.next(), control_plane.next()) {
        (Some(node), None) => vec![Offense::new(node.name.as_str())],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use drscore_model::{
        DaemonSet, Deployment, Inventory, Node, PodDisruptionBudget, RestoreSimResult, StatefulSet,
    };

    use super::*;

    fn sts(namespace: &str, name: &str, replicas: i32, has_volume_claim: bool) -> StatefulSet {
        StatefulSet {
            namespace: namespace.to_string(),
            name: name.to_string(),
            replicas,
            has_volume_claim,
        }
    }

    fn node(name: &str, roles: &[&str], ready: bool) -> Node {
        Node {
            name: name.to_string(),
            roles: roles.iter().map(|r| (*r).to_string()).collect(),
            ready,
        }
    }

    fn ids(offenses: &[Offense]) -> Vec<&str> {
        offenses.iter().map(|o| o.resource_id.as_str()).collect()
    }

    #[test]
    fn stateful_set_rules() {
        let inventory = Inventory {
            stateful_sets: vec![
                sts("db", "pg", 3, true),
                sts("cache", "redis", 1, false),
                sts("mq", "rabbit", 3, true),
                sts("logs", "unknown", 0, true),
                sts("queue", "nats", 1, true),
            ],
            pod_disruption_budgets: vec![PodDisruptionBudget {
                namespace: "mq".to_string(),
                name: "rabbit".to_string(),
            }],
            ..Inventory::default()
        };
        let sim = RestoreSimResult::default();
        let ctx = RuleContext::new(&inventory, &sim);

        assert_eq!(ids(&sts_no_pvc(&ctx)), vec!["cache/redis"]);
        assert_eq!(ids(&sts_single_replica(&ctx)), vec!["queue/nats"]);
        assert_eq!(ids(&sts_no_pdb(&ctx)), vec!["db/pg"]);
    }

    #[test]
    fn deployment_and_daemon_set_rules() {
        let inventory = Inventory {
            deployments: vec![
                Deployment {
                    namespace: "web".to_string(),
                    name: "front".to_string(),
                    replicas: 1,
                    ready: 0,
                },
                Deployment {
                    namespace: "kube-system".to_string(),
                    name: "coredns".to_string(),
                    replicas: 1,
                    ready: 1,
                },
                Deployment {
                    namespace: "web".to_string(),
                    name: "api".to_string(),
                    replicas: 3,
                    ready: 3,
                },
            ],
            daemon_sets: vec![DaemonSet {
                namespace: "kube-system".to_string(),
                name: "cni".to_string(),
                desired: 3,
                ready: 2,
            }],
            ..Inventory::default()
        };
        let sim = RestoreSimResult::default();
        let ctx = RuleContext::new(&inventory, &sim);

        assert_eq!(ids(&deployment_single_replica(&ctx)), vec!["deployments:web/front"]);
        let unavailable = workload_unavailable(&ctx);
        assert_eq!(ids(&unavailable), vec!["web/front", "kube-system/cni"]);
        assert_eq!(
            unavailable.last().and_then(|o| o.message.as_deref()),
            Some("DaemonSet has 2/3 pods ready")
        );
    }

    #[test]
    fn node_rules() {
        let inventory = Inventory {
            nodes: vec![
                node("cp-1", &["control-plane"], true),
                node("worker-1", &[], false),
                node("worker-2", &[], true),
            ],
            ..Inventory::default()
        };
        let sim = RestoreSimResult::default();
        let ctx = RuleContext::new(&inventory, &sim);
        assert_eq!(ids(&node_not_ready(&ctx)), vec!["worker-1"]);
        assert_eq!(ids(&control_plane_single(&ctx)), vec!["cp-1"]);

        let ha = Inventory {
            nodes: vec![
                node("cp-1", &["control-plane"], true),
                node("cp-2", &["master"], true),
            ],
            ..Inventory::default()
        };
        let ctx = RuleContext::new(&ha, &sim);
        assert!(control_plane_single(&ctx).is_empty());

        let managed = Inventory {
            nodes: vec![node("worker-1", &[], true)],
            ..Inventory::default()
        };
        let ctx = RuleContext::new(&managed, &sim);
        assert!(control_plane_single(&ctx).is_empty());
    }
}
