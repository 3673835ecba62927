use std::fs;
use std::path::PathBuf;

use drscore::{Inventory, Maturity, RecoveryTarget, ScoringProfile, assess};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    profile: String,
    inventory: Inventory,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Expected {
    overall: i32,
    maturity: Maturity,
    backup: i32,
    finding_ids: Vec<String>,
}

#[test]
fn scenario_cases_pass() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let fixture = root
        .join("..")
        .join("..")
        .join("data")
        .join("scenarios")
        .join("evaluation_cases.json");

    let content = fs::read_to_string(&fixture)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", fixture.display()));
    let cases: Vec<Case> = serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", fixture.display()));
    assert!(!cases.is_empty());

    for case in cases {
        let profile = ScoringProfile::normalize(&case.profile);
        let report = assess(&case.inventory, profile, RecoveryTarget::Vm);
        let ids: Vec<&str> = report.findings.iter().map(|f| f.id.as_str()).collect();

        assert_eq!(report.overall(), case.expected.overall, "case {}", case.name);
        assert_eq!(report.score.maturity, case.expected.maturity, "case {}", case.name);
        assert_eq!(
            report.score.backup.final_score, case.expected.backup,
            "case {}",
            case.name
        );
        assert_eq!(ids, case.expected.finding_ids, "case {}", case.name);
    }
}
