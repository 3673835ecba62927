use std::collections::BTreeSet;

use drscore_model::{ClusterRole, Pod, is_system_namespace, qualified_name};

use crate::context::RuleContext;
use crate::rule::Offense;
use crate::summary::aggregate_id;

const SYSTEM_HOST_PATH_NOTE: &str =
    "System pod uses hostPath (common for control plane/CNI). Review if acceptable for DR posture.";
const SYSTEM_PRIVILEGED_NOTE: &str =
    "System pod runs privileged (common for CNI/CSI agents). Review if acceptable for DR posture.";
const SYSTEM_HOST_NAMESPACE_NOTE: &str =
    "System pod shares host namespaces (common for node agents). Review if acceptable for DR posture.";

/// Per-pod offense that is informational inside system namespaces.
fn pod_offenses(
    ctx: &RuleContext<'_>,
    offends: impl Fn(&Pod) -> bool,
    system_note: &'static str,
) -> Vec<Offense> {
    ctx.inventory
        .pods
        .iter()
        .filter(|&pod| offends(pod))
        .map(|pod| {
            let offense = Offense::new(qualified_name(&pod.namespace, &pod.name));
            if is_system_namespace(&pod.namespace) {
                offense.informational(system_note)
            } else {
                offense
            }
        })
        .collect()
}

pub fn pod_host_path(ctx: &RuleContext<'_>) -> Vec<Offense> {
    pod_offenses(ctx, |pod| pod.uses_host_path, SYSTEM_HOST_PATH_NOTE)
}

pub fn pod_privileged(ctx: &RuleContext<'_>) -> Vec<Offense> {
    pod_offenses(ctx, |pod| pod.privileged, SYSTEM_PRIVILEGED_NOTE)
}

pub fn pod_host_namespace(ctx: &RuleContext<'_>) -> Vec<Offense> {
    pod_offenses(
        ctx,
        |pod| pod.host_network || pod.host_pid,
        SYSTEM_HOST_NAMESPACE_NOTE,
    )
}

fn aggregated_pods(
    ctx: &RuleContext<'_>,
    offends: impl Fn(&Pod) -> bool,
    noun: &str,
) -> Vec<Offense> {
    let names: Vec<String> = ctx
        .inventory
        .pods
        .iter()
        .filter(|&pod| !is_system_namespace(&pod.namespace) && offends(pod))
        .map(|pod| qualified_name(&pod.namespace, &pod.name))
        .collect();
    if names.is_empty() {
        return Vec::new();
    }
    vec![
        Offense::new(aggregate_id("pods", names.iter().map(String::as_str)))
            .with_message(format!("{} pod(s) {noun}", names.len())),
    ]
}

pub fn pod_no_resource_requests(ctx: &RuleContext<'_>) -> Vec<Offense> {
    aggregated_pods(
        ctx,
        |pod| !pod.has_requests,
        "run without CPU/memory requests",
    )
}

pub fn sa_token_automount(ctx: &RuleContext<'_>) -> Vec<Offense> {
    aggregated_pods(
        ctx,
        |pod| pod.automount_sa_token,
        "automount a service account token",
    )
}

/// Application namespaces (those running pods) lacking a given object kind.
fn namespaces_missing<'a>(
    ctx: &RuleContext<'a>,
    present: impl Iterator<Item = &'a str>,
    kind: &str,
) -> Vec<Offense> {
    let present: BTreeSet<&str> = present.collect();
    let missing: Vec<&str> = ctx
        .namespaces_with_pods()
        .into_iter()
        .filter(|ns| !is_system_namespace(ns) && !present.contains(ns))
        .collect();
    if missing.is_empty() {
        return Vec::new();
    }
    vec![
        Offense::new(aggregate_id("namespaces", missing.iter().copied()))
            .with_message(format!("{} namespace(s) have no {kind}", missing.len())),
    ]
}

pub fn namespace_no_network_policy(ctx: &RuleContext<'_>) -> Vec<Offense> {
    namespaces_missing(
        ctx,
        ctx.inventory
            .network_policies
            .iter()
            .map(|np| np.namespace.as_str()),
        "NetworkPolicy",
    )
}

pub fn namespace_no_limit_range(ctx: &RuleContext<'_>) -> Vec<Offense> {
    namespaces_missing(
        ctx,
        ctx.inventory
            .limit_ranges
            .iter()
            .map(|lr| lr.namespace.as_str()),
        "LimitRange",
    )
}

fn aggregated_roles(ctx: &RuleContext<'_>, offends: impl Fn(&ClusterRole) -> bool) -> Vec<Offense> {
    let names: Vec<&str> = ctx
        .inventory
        .cluster_roles
        .iter()
        .filter(|&role| role.custom && offends(role))
        .map(|role| role.name.as_str())
        .collect();
    if names.is_empty() {
        return Vec::new();
    }
    vec![Offense::new(aggregate_id("clusterroles", names))]
}

pub fn rbac_wildcard_verb(ctx: &RuleContext<'_>) -> Vec<Offense> {
    aggregated_roles(ctx, |role| role.has_wildcard_verb)
}

pub fn rbac_secret_access(ctx: &RuleContext<'_>) -> Vec<Offense> {
    aggregated_roles(ctx, |role| role.has_secret_access)
}

pub fn rbac_escalation(ctx: &RuleContext<'_>) -> Vec<Offense> {
    aggregated_roles(ctx, |role| role.has_escalate_priv)
}

pub fn rbac_cluster_admin_binding(ctx: &RuleContext<'_>) -> Vec<Offense> {
    ctx.inventory
        .cluster_role_bindings
        .iter()
        .filter(|binding| binding.role_name == "cluster-admin")
        .filter_map(|binding| {
            let subjects: BTreeSet<&str> = binding.non_system_subjects().collect();
            (!subjects.is_empty()).then(|| {
                Offense::new(binding.name.as_str()).with_message(format!(
                    "cluster-admin granted to {}",
                    subjects.into_iter().collect::<Vec<_>>().join(",")
                ))
            })
        })
        .collect()
}

pub fn ingress_no_tls(ctx: &RuleContext<'_>) -> Vec<Offense> {
    ctx.inventory
        .ingresses
        .iter()
        .filter(|ingress| !ingress.tls)
        .map(|ingress| Offense::new(qualified_name(&ingress.namespace, &ingress.name)))
        .collect()
}
