use drscore_core::{DomainLedger, ProfileWeights, Score, ScoringProfile};
use drscore_model::{Finding, Inventory, RestoreSimResult};
use tracing::{debug, info};

use crate::catalog::{NO_TOOL_RULE, catalog};
use crate::context::RuleContext;
use crate::rule::Rule;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub score: Score,
    pub findings: Vec<Finding>,
}

/// Scores `inventory` against the full rule catalog.
///
/// Single pass and side-effect free: identical inputs always produce an
/// identical score and finding list.
pub fn evaluate(
    inventory: &Inventory,
    sim: &RestoreSimResult,
    profile: ScoringProfile,
) -> Evaluation {
    let ctx = RuleContext::new(inventory, sim);
    let evaluation = evaluate_rules(catalog(), &ctx, &profile.weights());
    info!(
        profile = %profile,
        overall = evaluation.score.overall.final_score,
        maturity = %evaluation.score.maturity,
        findings = evaluation.findings.len(),
        "evaluation complete"
    );
    evaluation
}

/// Runs `rules` in order; clamping happens once, after every penalty landed.
///
/// When `rules` contains the no-tool rule, deductions from `tool_gap` rules
/// are capped one point below its scaled penalty, so a detected tool never
/// scores worse than no tool at all.
pub fn evaluate_rules(rules: &[Rule], ctx: &RuleContext<'_>, weights: &ProfileWeights) -> Evaluation {
    let mut ledger = DomainLedger::new();
    let mut findings = Vec::new();
    let mut gap_budget = rules
        .iter()
        .find(|rule| rule.id == NO_TOOL_RULE)
        .map(|rule| weights.penalty_for(rule.penalty, rule.category).saturating_sub(1));

    for rule in rules {
        let offenses = (rule.check)(ctx);
        if offenses.is_empty() {
            continue;
        }

        let penalty = weights.penalty_for(rule.penalty, rule.category);
        let mut deducted = 0_u32;
        for offense in offenses.iter().filter(|offense| offense.penalized) {
            let charge = match gap_budget.as_mut() {
                Some(budget) if rule.tool_gap => {
                    let charge = penalty.min(*budget);
                    *budget -= charge;
                    charge
                }
                _ => penalty,
            };
            ledger.penalize(rule.domain, charge);
            deducted = deducted.saturating_add(charge);
            debug!(rule = rule.id, resource = %offense.resource_id, charge, "penalized");
        }
        debug!(
            rule = rule.id,
            domain = %rule.domain,
            offenses = offenses.len(),
            deducted,
            "rule evaluated"
        );

        findings.extend(offenses.into_iter().map(|offense| Finding {
            id: rule.id.to_string(),
            severity: offense.severity.unwrap_or(rule.severity),
            resource_id: offense.resource_id,
            message: offense.message.unwrap_or_else(|| rule.message.to_string()),
            recommendation: offense
                .recommendation
                .unwrap_or(rule.recommendation)
                .to_string(),
        }));
    }

    Evaluation {
        score: ledger.finish(),
        findings,
    }
}
