use drscore_core::{RiskPosture, ScoringProfile};
use drscore_model::{
    AssessmentReport, FindingCounts, Inventory, InventoryKeys, REPORT_SCHEMA_VERSION,
    RecoveryTarget,
};
use tracing::{debug, info};

/// Scores one snapshot. The input is left untouched; normalization happens on
/// a private copy.
pub fn assess(
    inventory: &Inventory,
    profile: ScoringProfile,
    target: RecoveryTarget,
) -> AssessmentReport {
    let mut inventory = inventory.clone();
    if inventory.backup.resolve_primary_tool() {
        debug!(
            tool = %inventory.backup.primary_tool,
            "primary backup tool taken from detected tools"
        );
    }
    let backfilled = inventory.backup.backfill_rpo();
    if backfilled > 0 {
        debug!(policies = backfilled, "rpo estimated from schedules");
    }

    let sim = drscore_restore::simulate(&inventory, &inventory.backup);
    inventory.backup.restore_sim = Some(sim.clone());

    let evaluation = drscore_analyze::evaluate(&inventory, &sim, profile);
    let remediation = drscore_remediation::generate(&inventory, &evaluation.findings, target);
    let overall = evaluation.score.overall.final_score;
    let risk = RiskPosture::from_score(overall);

    info!(
        overall,
        risk = risk.as_str(),
        steps = remediation.len(),
        "assessment complete"
    );

    AssessmentReport {
        schema_version: REPORT_SCHEMA_VERSION.to_string(),
        profile,
        target,
        primary_tool: inventory.backup.primary_tool.clone(),
        finding_counts: FindingCounts::tally(&evaluation.findings),
        score: evaluation.score,
        risk,
        findings: evaluation.findings,
        restore_sim: sim,
        remediation,
        inventory: InventoryKeys::of(&inventory),
    }
}
