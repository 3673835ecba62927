use std::collections::BTreeSet;

use drscore_core::DAILY_RPO_HOURS;
use drscore_model::{BackupPolicy, qualified_name};

use crate::context::RuleContext;
use crate::rule::Offense;
use crate::summary::{SUMMARY_LIMIT, aggregate_id, join_first};

const CERT_EXPIRY_WINDOW_DAYS: i32 = 30;

pub fn backup_none(ctx: &RuleContext<'_>) -> Vec<Offense> {
    if ctx.tool_detected() {
        return Vec::new();
    }
    vec![Offense::new("cluster")]
}

/// A tool is installed but reports neither policies nor covered namespaces.
fn tool_unconfigured(ctx: &RuleContext<'_>) -> bool {
    let backup = ctx.backup;
    ctx.tool_detected() && backup.policies.is_empty() && backup.covered_namespaces.is_empty()
}

/// Coverage and offsite rules only judge a tool that has some configuration;
/// an unconfigured tool is reported once, by `BACKUP_NO_POLICIES`.
fn tool_configured(ctx: &RuleContext<'_>) -> bool {
    ctx.tool_detected() && !tool_unconfigured(ctx)
}

pub fn backup_no_policies(ctx: &RuleContext<'_>) -> Vec<Offense> {
    if !tool_unconfigured(ctx) {
        return Vec::new();
    }
    vec![Offense::new(ctx.backup.primary_tool.trim())]
}

/// Stateful namespaces outside every backup policy, as reported by the
/// detector and as found by the restore simulation.
pub fn backup_partial_coverage(ctx: &RuleContext<'_>) -> Vec<Offense> {
    if !tool_configured(ctx) {
        return Vec::new();
    }
    let stateful: BTreeSet<&str> = ctx
        .inventory
        .stateful_sets
        .iter()
        .map(|sts| sts.namespace.as_str())
        .collect();
    let uncovered: BTreeSet<&str> = ctx
        .backup
        .uncovered_stateful_namespaces
        .iter()
        .map(String::as_str)
        .chain(
            ctx.sim
                .uncovered_namespaces
                .iter()
                .map(String::as_str)
                .filter(|ns| stateful.contains(ns)),
        )
        .collect();
    if uncovered.is_empty() {
        return Vec::new();
    }
    vec![Offense::new(aggregate_id("namespaces", uncovered))]
}

/// Volume-weighted gap from the restore simulation.
pub fn restore_coverage_gap(ctx: &RuleContext<'_>) -> Vec<Offense> {
    let sim = ctx.sim;
    if !tool_configured(ctx) || sim.uncovered_namespaces.is_empty() {
        return Vec::new();
    }
    let names = sim.uncovered_namespaces.iter().map(String::as_str);
    let message = sim.coverage_percent().map_or_else(
        || {
            format!(
                "{} namespace(s) with stateful workloads are not covered by any backup",
                sim.uncovered_namespaces.len()
            )
        },
        |pct| {
            format!(
                "Only {pct:.1}% of claimed volume is covered ({:.1} of {:.1} GiB)",
                sim.covered_pvcs_gb, sim.total_pvcs_gb
            )
        },
    );
    vec![Offense::new(aggregate_id("namespaces", names)).with_message(message)]
}

pub fn restore_blocked(ctx: &RuleContext<'_>) -> Vec<Offense> {
    if !ctx.tool_detected() {
        return Vec::new();
    }
    ctx.sim
        .namespaces
        .iter()
        .filter(|ns| ns.is_blocked())
        .map(|ns| {
            Offense::new(ns.namespace.as_str()).with_message(format!(
                "Restore blocked: {}",
                join_first(ns.blockers.iter().map(String::as_str), SUMMARY_LIMIT)
            ))
        })
        .collect()
}

pub fn backup_assumed_coverage(ctx: &RuleContext<'_>) -> Vec<Offense> {
    if !ctx.tool_detected() || !ctx.backup.assumes_wildcard_coverage() {
        return Vec::new();
    }
    let mut offense = Offense::new(ctx.backup.primary_tool.trim());
    offense.penalized = false;
    vec![offense]
}

pub fn backup_no_offsite(ctx: &RuleContext<'_>) -> Vec<Offense> {
    if !tool_configured(ctx) || ctx.backup.offsite_configured() {
        return Vec::new();
    }
    vec![Offense::new(ctx.backup.primary_tool.trim())]
}

pub fn backup_rpo_exceeds_day(ctx: &RuleContext<'_>) -> Vec<Offense> {
    if !ctx.tool_detected() {
        return Vec::new();
    }
    let slow: Vec<&str> = ctx
        .sim
        .namespaces
        .iter()
        .filter(|ns| ns.has_coverage && ns.rpo_hours.is_some_and(|h| h > DAILY_RPO_HOURS))
        .map(|ns| ns.namespace.as_str())
        .collect();
    if slow.is_empty() {
        return Vec::new();
    }
    vec![Offense::new(aggregate_id("namespaces", slow))]
}

fn policy_names(ctx: &RuleContext<'_>, offends: impl Fn(&BackupPolicy) -> bool) -> Vec<String> {
    ctx.backup
        .policies
        .iter()
        .filter(|&policy| offends(policy))
        .map(|policy| match policy.policy_namespace.as_deref() {
            Some(ns) if !ns.is_empty() => qualified_name(ns, &policy.name),
            _ => policy.name.clone(),
        })
        .collect()
}

pub fn backup_rpo_unknown(ctx: &RuleContext<'_>) -> Vec<Offense> {
    if !ctx.tool_detected() {
        return Vec::new();
    }
    let names = policy_names(ctx, |policy| policy.rpo_hours.is_none());
    if names.is_empty() {
        return Vec::new();
    }
    vec![Offense::new(aggregate_id(
        "policies",
        names.iter().map(String::as_str),
    ))]
}

pub fn backup_no_retention(ctx: &RuleContext<'_>) -> Vec<Offense> {
    if !ctx.tool_detected() {
        return Vec::new();
    }
    let names = policy_names(ctx, |policy| !policy.has_retention());
    if names.is_empty() {
        return Vec::new();
    }
    vec![Offense::new(aggregate_id(
        "policies",
        names.iter().map(String::as_str),
    ))]
}

pub fn snapshot_class_none(ctx: &RuleContext<'_>) -> Vec<Offense> {
    let inventory = ctx.inventory;
    if !ctx.tool_detected()
        || inventory.pvcs.is_empty()
        || !inventory.volume_snapshot_classes.is_empty()
    {
        return Vec::new();
    }
    vec![Offense::new("volumesnapshotclasses")]
}

pub fn etcd_backup_missing(ctx: &RuleContext<'_>) -> Vec<Offense> {
    match &ctx.inventory.etcd_backup {
        Some(evidence) if !evidence.detected => vec![Offense::new("etcd")],
        _ => Vec::new(),
    }
}

pub fn crd_no_backup(ctx: &RuleContext<'_>) -> Vec<Offense> {
    if ctx.tool_detected() || ctx.inventory.crds.is_empty() {
        return Vec::new();
    }
    vec![
        Offense::new("crds")
            .with_message(format!(
                "{} Custom Resource Definition(s) present but no backup tool detected",
                ctx.inventory.crds.len()
            )),
    ]
}

/// Penalized once per scan, against the certificate expiring soonest.
pub fn cert_expiring_soon(ctx: &RuleContext<'_>) -> Vec<Offense> {
    ctx.inventory
        .certificates
        .iter()
        .filter(|cert| cert.expires_within(CERT_EXPIRY_WINDOW_DAYS))
        .map(|cert| {
            (
                cert.days_to_expiry.unwrap_or(CERT_EXPIRY_WINDOW_DAYS),
                qualified_name(&cert.namespace, &cert.name),
            )
        })
        .min()
        .map(|(days, id)| {
            vec![Offense::new(id).with_message(format!("Certificate expires in {days} day(s)"))]
        })
        .unwrap_or_default()
}

pub fn image_external_registry(ctx: &RuleContext<'_>) -> Vec<Offense> {
    let public = ctx.inventory.images.iter().filter(|img| img.is_public).count();
    if public == 0 {
        return Vec::new();
    }
    vec![
        Offense::new("images")
            .with_message(format!("{public} image(s) are pulled from public registries")),
    ]
}

pub fn helm_untracked(ctx: &RuleContext<'_>) -> Vec<Offense> {
    if ctx.tool_detected() || ctx.inventory.helm_releases.is_empty() {
        return Vec::new();
    }
    vec![Offense::new("helm")]
}
