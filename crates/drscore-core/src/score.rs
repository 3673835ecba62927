use std::fmt;

use serde::{Deserialize, Serialize};

pub const MAX_DOMAIN_SCORE: i32 = 100;

pub const STORAGE_WEIGHT: i32 = 35;
pub const WORKLOAD_WEIGHT: i32 = 20;
pub const CONFIG_WEIGHT: i32 = 15;
pub const BACKUP_WEIGHT: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Storage,
    Workload,
    Config,
    Backup,
}

impl Domain {
    pub const ALL: [Self; 4] = [Self::Storage, Self::Workload, Self::Config, Self::Backup];

    pub const fn weight(self) -> i32 {
        match self {
            Self::Storage => STORAGE_WEIGHT,
            Self::Workload => WORKLOAD_WEIGHT,
            Self::Config => CONFIG_WEIGHT,
            Self::Backup => BACKUP_WEIGHT,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Workload => "workload",
            Self::Config => "config",
            Self::Backup => "backup",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainScore {
    pub max: i32,
    #[serde(rename = "final")]
    pub final_score: i32,
}

impl DomainScore {
    pub const fn new(final_score: i32) -> Self {
        Self {
            max: MAX_DOMAIN_SCORE,
            final_score,
        }
    }
}

impl Default for DomainScore {
    fn default() -> Self {
        Self::new(MAX_DOMAIN_SCORE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Maturity {
    Platinum,
    Gold,
    Silver,
    Bronze,
}

impl Maturity {
    pub const fn from_overall(overall: i32) -> Self {
        if overall >= 90 {
            Self::Platinum
        } else if overall >= 75 {
            Self::Gold
        } else if overall >= 50 {
            Self::Silver
        } else {
            Self::Bronze
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Platinum => "PLATINUM",
            Self::Gold => "GOLD",
            Self::Silver => "SILVER",
            Self::Bronze => "BRONZE",
        }
    }
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted score shape; field names are part of the report contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub storage: DomainScore,
    pub workload: DomainScore,
    pub config: DomainScore,
    pub backup: DomainScore,
    pub overall: DomainScore,
    pub maturity: Maturity,
}

impl Score {
    /// Clamps each domain, then derives the weighted overall and the tier.
    pub fn from_domains(storage: i32, workload: i32, config: i32, backup: i32) -> Self {
        let storage = clamp_score(storage);
        let workload = clamp_score(workload);
        let config = clamp_score(config);
        let backup = clamp_score(backup);
        let overall = weighted_overall(storage, workload, config, backup);

        Self {
            storage: DomainScore::new(storage),
            workload: DomainScore::new(workload),
            config: DomainScore::new(config),
            backup: DomainScore::new(backup),
            overall: DomainScore::new(overall),
            maturity: Maturity::from_overall(overall),
        }
    }

    pub const fn domain(&self, domain: Domain) -> DomainScore {
        match domain {
            Domain::Storage => self.storage,
            Domain::Workload => self.workload,
            Domain::Config => self.config,
            Domain::Backup => self.backup,
        }
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::from_domains(
            MAX_DOMAIN_SCORE,
            MAX_DOMAIN_SCORE,
            MAX_DOMAIN_SCORE,
            MAX_DOMAIN_SCORE,
        )
    }
}

pub fn clamp_score(value: i32) -> i32 {
    value.clamp(0, MAX_DOMAIN_SCORE)
}

/// `(S*35 + W*20 + C*15 + B*30 + 50) / 100` in integer arithmetic.
///
/// Trend and compare tooling diff this value across scans, so the rounding
/// must stay half-up on the weighted integer sum.
pub fn weighted_overall(storage: i32, workload: i32, config: i32, backup: i32) -> i32 {
    let sum = storage * STORAGE_WEIGHT
        + workload * WORKLOAD_WEIGHT
        + config * CONFIG_WEIGHT
        + backup * BACKUP_WEIGHT;
    (sum + 50) / 100
}

/// Running per-domain totals for one evaluation pass.
///
/// Penalties may drive a total below zero; clamping happens once, in
/// [`DomainLedger::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainLedger {
    storage: i32,
    workload: i32,
    config: i32,
    backup: i32,
}

impl Default for DomainLedger {
    fn default() -> Self {
        Self {
            storage: MAX_DOMAIN_SCORE,
            workload: MAX_DOMAIN_SCORE,
            config: MAX_DOMAIN_SCORE,
            backup: MAX_DOMAIN_SCORE,
        }
    }
}

impl DomainLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn penalize(&mut self, domain: Domain, amount: u32) {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        let slot = match domain {
            Domain::Storage => &mut self.storage,
            Domain::Workload => &mut self.workload,
            Domain::Config => &mut self.config,
            Domain::Backup => &mut self.backup,
        };
        *slot = slot.saturating_sub(amount);
    }

    pub const fn raw(&self, domain: Domain) -> i32 {
        match domain {
            Domain::Storage => self.storage,
            Domain::Workload => self.workload,
            Domain::Config => self.config,
            Domain::Backup => self.backup,
        }
    }

    pub fn finish(&self) -> Score {
        Score::from_domains(self.storage, self.workload, self.config, self.backup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one_hundred() {
        let total: i32 = Domain::ALL.iter().map(|d| d.weight()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn weighted_overall_identity_cases() {
        assert_eq!(weighted_overall(100, 100, 100, 100), 100);
        assert_eq!(weighted_overall(0, 0, 0, 0), 0);
        assert_eq!(weighted_overall(100, 0, 0, 0), 35);
        assert_eq!(weighted_overall(0, 100, 0, 0), 20);
        assert_eq!(weighted_overall(0, 0, 100, 0), 15);
        assert_eq!(weighted_overall(0, 0, 0, 100), 30);
        assert_eq!(weighted_overall(65, 70, 100, 40), 64);
    }

    #[test]
    fn weighted_overall_rounds_half_up() {
        // 1*35 + 1*15 = 50 -> (50 + 50) / 100 = 1
        assert_eq!(weighted_overall(1, 0, 1, 0), 1);
        // 1*20 + 1*15 = 35 -> 0
        assert_eq!(weighted_overall(0, 1, 1, 0), 0);
    }

    #[test]
    fn overall_stays_within_bounds() {
        for s in (0..=100).step_by(5) {
            for w in (0..=100).step_by(5) {
                for c in (0..=100).step_by(5) {
                    for b in (0..=100).step_by(5) {
                        let overall = weighted_overall(s, w, c, b);
                        assert!((0..=100).contains(&overall), "{s} {w} {c} {b}");
                    }
                }
            }
        }
    }

    #[test]
    fn clamp_score_bounds() {
        assert_eq!(clamp_score(-10), 0);
        assert_eq!(clamp_score(0), 0);
        assert_eq!(clamp_score(50), 50);
        assert_eq!(clamp_score(100), 100);
        assert_eq!(clamp_score(110), 100);
    }

    #[test]
    fn maturity_thresholds_are_inclusive() {
        assert_eq!(Maturity::from_overall(100), Maturity::Platinum);
        assert_eq!(Maturity::from_overall(90), Maturity::Platinum);
        assert_eq!(Maturity::from_overall(89), Maturity::Gold);
        assert_eq!(Maturity::from_overall(75), Maturity::Gold);
        assert_eq!(Maturity::from_overall(74), Maturity::Silver);
        assert_eq!(Maturity::from_overall(50), Maturity::Silver);
        assert_eq!(Maturity::from_overall(49), Maturity::Bronze);
        assert_eq!(Maturity::from_overall(0), Maturity::Bronze);
    }

    #[test]
    fn ledger_clamps_once_after_all_penalties() {
        let mut ledger = DomainLedger::new();
        ledger.penalize(Domain::Backup, 60);
        ledger.penalize(Domain::Backup, 60);
        ledger.penalize(Domain::Storage, 25);
        assert_eq!(ledger.raw(Domain::Backup), -20);

        let score = ledger.finish();
        assert_eq!(score.backup.final_score, 0);
        assert_eq!(score.storage.final_score, 75);
        assert_eq!(score.workload, DomainScore::new(100));
        assert_eq!(score.overall.max, 100);
    }

    #[test]
    fn score_serializes_with_final_field() {
        let json = serde_json::to_value(Score::default()).unwrap_or_default();
        assert_eq!(json["storage"]["max"], 100);
        assert_eq!(json["overall"]["final"], 100);
        assert_eq!(json["maturity"], "PLATINUM");
    }
}
