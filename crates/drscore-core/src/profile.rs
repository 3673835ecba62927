use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Penalty families a scoring profile may amplify or dampen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PenaltyCategory {
    Immutability,
    Replication,
    RestoreTesting,
    Security,
    Airgap,
}

impl PenaltyCategory {
    pub const ALL: [Self; 5] = [
        Self::Immutability,
        Self::Replication,
        Self::RestoreTesting,
        Self::Security,
        Self::Airgap,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Immutability => "immutability",
            Self::Replication => "replication",
            Self::RestoreTesting => "restoreTesting",
            Self::Security => "security",
            Self::Airgap => "airgap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringProfile {
    #[default]
    Standard,
    Enterprise,
    Dev,
    Airgap,
}

impl ScoringProfile {
    /// Resolves a user-supplied profile name. Unknown names become `Standard`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "enterprise" => Self::Enterprise,
            "dev" => Self::Dev,
            "airgap" => Self::Airgap,
            _ => Self::Standard,
        }
    }

    /// True when `raw` names a profile rather than falling back to `Standard`.
    pub fn is_known(raw: &str) -> bool {
        matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "standard" | "enterprise" | "dev" | "airgap"
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Enterprise => "enterprise",
            Self::Dev => "dev",
            Self::Airgap => "airgap",
        }
    }

    pub fn weights(self) -> ProfileWeights {
        let overrides: &[(PenaltyCategory, f64)] = match self {
            Self::Standard => &[],
            Self::Enterprise => &[
                (PenaltyCategory::RestoreTesting, 1.50),
                (PenaltyCategory::Immutability, 1.30),
                (PenaltyCategory::Replication, 1.20),
                (PenaltyCategory::Security, 1.20),
            ],
            Self::Dev => &[
                (PenaltyCategory::RestoreTesting, 1.10),
                (PenaltyCategory::Immutability, 0.90),
                (PenaltyCategory::Replication, 0.90),
            ],
            Self::Airgap => &[
                (PenaltyCategory::Immutability, 1.60),
                (PenaltyCategory::Airgap, 1.60),
                (PenaltyCategory::Security, 1.30),
                (PenaltyCategory::RestoreTesting, 1.20),
            ],
        };
        ProfileWeights::from_overrides(overrides.iter().copied())
    }
}

impl fmt::Display for ScoringProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ScoringProfile {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

/// Sparse multiplier map: categories without an override scale by 1.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileWeights {
    overrides: BTreeMap<PenaltyCategory, f64>,
}

impl ProfileWeights {
    pub fn from_overrides(overrides: impl IntoIterator<Item = (PenaltyCategory, f64)>) -> Self {
        Self {
            overrides: overrides.into_iter().collect(),
        }
    }

    pub fn multiplier(&self, category: PenaltyCategory) -> f64 {
        self.overrides.get(&category).copied().unwrap_or(1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Penalty for a rule; uncategorised rules are never scaled.
    pub fn penalty_for(&self, base: u32, category: Option<PenaltyCategory>) -> u32 {
        match category {
            Some(category) => scale_penalty(base, self.multiplier(category)),
            None => base,
        }
    }
}

/// Rounds `base * multiplier` to the nearest integer, never below 1.
pub fn scale_penalty(base: u32, multiplier: f64) -> u32 {
    let scaled = (f64::from(base) * multiplier).round();
    if scaled.is_nan() || scaled < 1.0 {
        1
    } else {
        // float-to-int `as` saturates at u32::MAX
        scaled as u32
    }
}
