use std::collections::{BTreeMap, BTreeSet};

use drscore_core::{Domain, Maturity};
use drscore_model::{AssessmentReport, Finding};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::trend::Trend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDelta {
    pub domain: Domain,
    pub before: i32,
    pub after: i32,
    pub delta: i32,
}

/// Keys present on only one side of a comparison, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetChange {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SetChange {
    pub fn between(before: &[String], after: &[String]) -> Self {
        let before: BTreeSet<&str> = before.iter().map(String::as_str).collect();
        let after: BTreeSet<&str> = after.iter().map(String::as_str).collect();
        Self {
            added: after.difference(&before).map(|k| (*k).to_string()).collect(),
            removed: before.difference(&after).map(|k| (*k).to_string()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// What changed between two assessments of the same cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDiff {
    pub score_before: i32,
    pub score_after: i32,
    pub score_delta: i32,
    pub domains: Vec<DomainDelta>,
    pub maturity_before: Maturity,
    pub maturity_after: Maturity,
    pub maturity_changed: bool,
    pub tool_before: String,
    pub tool_after: String,
    pub tool_changed: bool,
    pub new_findings: Vec<Finding>,
    pub resolved_findings: Vec<Finding>,
    pub newly_uncovered_namespaces: Vec<String>,
    pub newly_covered_namespaces: Vec<String>,
    pub namespaces: SetChange,
    pub workloads: SetChange,
    pub pvcs: SetChange,
    pub images: SetChange,
    pub trend: Trend,
}

impl ReportDiff {
    pub const fn improved(&self) -> bool {
        self.score_delta > 0
    }

    pub const fn regressed(&self) -> bool {
        self.score_delta < 0
    }
}

pub fn diff(previous: &AssessmentReport, current: &AssessmentReport) -> ReportDiff {
    let score_before = previous.overall();
    let score_after = current.overall();

    let domains = Domain::ALL
        .iter()
        .map(|&domain| {
            let before = previous.score.domain(domain).final_score;
            let after = current.score.domain(domain).final_score;
            DomainDelta {
                domain,
                before,
                after,
                delta: after - before,
            }
        })
        .collect();

    let before_findings = keyed(&previous.findings);
    let after_findings = keyed(&current.findings);
    let new_findings = missing_from(&after_findings, &before_findings);
    let resolved_findings = missing_from(&before_findings, &after_findings);

    let uncovered = SetChange::between(
        &previous.restore_sim.uncovered_namespaces,
        &current.restore_sim.uncovered_namespaces,
    );
    let (before, after) = (&previous.inventory, &current.inventory);
    let workloads = SetChange::between(&before.workloads, &after.workloads);

    let tool_changed = !previous
        .primary_tool
        .trim()
        .eq_ignore_ascii_case(current.primary_tool.trim());

    debug!(
        score_before,
        score_after,
        new = new_findings.len(),
        resolved = resolved_findings.len(),
        workloads_added = workloads.added.len(),
        workloads_removed = workloads.removed.len(),
        "reports compared"
    );

    ReportDiff {
        score_before,
        score_after,
        score_delta: score_after - score_before,
        domains,
        maturity_before: previous.score.maturity,
        maturity_after: current.score.maturity,
        maturity_changed: previous.score.maturity != current.score.maturity,
        tool_before: previous.primary_tool.clone(),
        tool_after: current.primary_tool.clone(),
        tool_changed,
        new_findings,
        resolved_findings,
        newly_uncovered_namespaces: uncovered.added,
        newly_covered_namespaces: uncovered.removed,
        namespaces: SetChange::between(&before.namespaces, &after.namespaces),
        workloads,
        pvcs: SetChange::between(&before.pvcs, &after.pvcs),
        images: SetChange::between(&before.images, &after.images),
        trend: Trend::compute(f64::from(score_before), f64::from(score_after)),
    }
}

/// First finding per `id|resourceId`, ordered by key.
fn keyed(findings: &[Finding]) -> BTreeMap<String, &Finding> {
    let mut map = BTreeMap::new();
    for finding in findings {
        map.entry(finding.key()).or_insert(finding);
    }
    map
}

fn missing_from(
    side: &BTreeMap<String, &Finding>,
    other: &BTreeMap<String, &Finding>,
) -> Vec<Finding> {
    side.iter()
        .filter(|(key, _)| !other.contains_key(*key))
        .map(|(_, finding)| (*finding).clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use drscore_core::{RiskPosture, Score, ScoringProfile};
    use drscore_model::{
        FindingCounts, InventoryKeys, REPORT_SCHEMA_VERSION, RecoveryTarget, RestoreSimResult,
        Severity,
    };

    use super::*;
    use crate::trend::Direction;

    fn report(domains: (i32, i32, i32, i32), tool: &str, findings: &[(&str, &str)]) -> AssessmentReport {
        let (s, w, c, b) = domains;
        let score = Score::from_domains(s, w, c, b);
        let findings: Vec<Finding> = findings
            .iter()
            .map(|(id, rid)| Finding::new(*id, Severity::High, *rid, "", ""))
            .collect();
        AssessmentReport {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            profile: ScoringProfile::Standard,
            target: RecoveryTarget::Vm,
            primary_tool: tool.to_string(),
            risk: RiskPosture::from_score(score.overall.final_score),
            score,
            finding_counts: FindingCounts::tally(&findings),
            findings,
            restore_sim: RestoreSimResult::default(),
            remediation: Vec::new(),
            inventory: InventoryKeys::default(),
        }
    }

    fn keys(findings: &[Finding]) -> Vec<String> {
        findings.iter().map(Finding::key).collect()
    }

    #[test]
    fn installing_a_backup_tool_resolves_backup_none() {
        let before = report(
            (65, 70, 100, 40),
            "none",
            &[("STS_NO_PVC", "db/pg"), ("BACKUP_NONE", "cluster")],
        );
        let after = report(
            (65, 70, 100, 90),
            "velero",
            &[("STS_NO_PVC", "db/pg"), ("BACKUP_RPO_UNKNOWN", "policies:daily")],
        );
        let change = diff(&before, &after);

        assert_eq!(change.score_before, 64);
        assert_eq!(change.score_after, 79);
        assert!(change.improved());
        assert!(!change.regressed());
        assert!(change.maturity_changed);
        assert_eq!(change.maturity_after, Maturity::Gold);
        assert!(change.tool_changed);
        assert_eq!(keys(&change.new_findings), vec!["BACKUP_RPO_UNKNOWN|policies:daily"]);
        assert_eq!(keys(&change.resolved_findings), vec!["BACKUP_NONE|cluster"]);
        assert_eq!(change.trend.direction, Direction::Up);

        let backup = change.domains.iter().find(|d| d.domain == Domain::Backup);
        assert_eq!(backup.map(|d| d.delta), Some(50));
    }

    #[test]
    fn identical_reports_are_flat() {
        let report = report((80, 80, 80, 80), "Velero", &[("PV_ORPHAN", "pv-1")]);
        let mut again = report.clone();
        again.primary_tool = "velero".to_string();
        let change = diff(&report, &again);
        assert_eq!(change.score_delta, 0);
        assert!(!change.improved() && !change.regressed());
        assert!(!change.tool_changed);
        assert!(!change.maturity_changed);
        assert!(change.new_findings.is_empty() && change.resolved_findings.is_empty());
        assert_eq!(change.trend.direction, Direction::Flat);
    }

    #[test]
    fn uncovered_namespace_moves_are_sorted() {
        let mut before = report((100, 100, 100, 100), "velero", &[]);
        before.restore_sim.uncovered_namespaces = vec!["db".to_string(), "cache".to_string()];
        let mut after = before.clone();
        after.restore_sim.uncovered_namespaces =
            vec!["queue".to_string(), "db".to_string(), "auth".to_string()];

        let change = diff(&before, &after);
        assert_eq!(change.newly_uncovered_namespaces, vec!["auth", "queue"]);
        assert_eq!(change.newly_covered_namespaces, vec!["cache"]);
    }

    #[test]
    fn inventory_churn_is_reported_per_kind() {
        let strings = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
        let mut before = report((90, 90, 90, 90), "velero", &[]);
        before.inventory = InventoryKeys {
            namespaces: strings(&["db", "legacy", "web"]),
            workloads: strings(&["db/pg (StatefulSet)", "legacy/cron (Deployment)"]),
            pvcs: strings(&["db/data-0"]),
            images: strings(&["postgres:15"]),
        };
        let mut after = report((80, 90, 90, 90), "velero", &[]);
        after.inventory = InventoryKeys {
            namespaces: strings(&["db", "queue", "web"]),
            workloads: strings(&["db/pg (StatefulSet)", "queue/nats (StatefulSet)"]),
            pvcs: strings(&["db/data-0", "queue/data-0"]),
            images: strings(&["postgres:16"]),
        };

        let change = diff(&before, &after);
        assert!(change.regressed());
        assert_eq!(change.namespaces.added, vec!["queue"]);
        assert_eq!(change.namespaces.removed, vec!["legacy"]);
        assert_eq!(change.workloads.added, vec!["queue/nats (StatefulSet)"]);
        assert_eq!(change.workloads.removed, vec!["legacy/cron (Deployment)"]);
        assert_eq!(change.pvcs.added, vec!["queue/data-0"]);
        assert!(change.pvcs.removed.is_empty());
        assert_eq!(change.images.added, vec!["postgres:16"]);
        assert_eq!(change.images.removed, vec!["postgres:15"]);

        let unchanged = diff(&after, &after);
        assert!(unchanged.namespaces.is_empty() && unchanged.workloads.is_empty());
        assert!(unchanged.pvcs.is_empty() && unchanged.images.is_empty());
    }
}
