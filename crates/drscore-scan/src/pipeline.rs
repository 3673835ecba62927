use std::io::Write;

use drscore::{AssessmentReport, Inventory, ReportDiff, assess, diff};
use serde::Serialize;
use tracing::info;

use crate::config::ScanConfig;
use crate::error::ScanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gate {
    pub min_score: i32,
    pub passed: bool,
}

/// The document written to stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub report: AssessmentReport,
    pub gate: Gate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ReportDiff>,
}

pub fn run(config: &ScanConfig) -> Result<ScanOutcome, ScanError> {
    let inventory = Inventory::load(&config.snapshot)?;
    info!(
        snapshot = %config.snapshot.display(),
        profile = %config.profile,
        target = %config.target,
        "snapshot loaded"
    );

    let report = assess(&inventory, config.profile, config.target);
    let comparison = match &config.compare {
        Some(path) => {
            let previous = AssessmentReport::load(path)?;
            let change = diff(&previous, &report);
            info!(
                previous = %path.display(),
                delta = change.score_delta,
                regressed = change.regressed(),
                "compared with previous report"
            );
            Some(change)
        }
        None => None,
    };

    let gate = Gate {
        min_score: config.min_score,
        passed: report.passes(config.min_score),
    };
    info!(
        overall = report.overall(),
        min_score = gate.min_score,
        passed = gate.passed,
        "gate evaluated"
    );

    Ok(ScanOutcome {
        report,
        gate,
        comparison,
    })
}

pub fn write_outcome(mut writer: impl Write, outcome: &ScanOutcome) -> Result<(), ScanError> {
    serde_json::to_writer_pretty(&mut writer, outcome)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
