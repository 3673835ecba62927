use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskPosture {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskPosture {
    pub const fn from_score(overall: i32) -> Self {
        if overall >= 90 {
            Self::Low
        } else if overall >= 70 {
            Self::Moderate
        } else if overall >= 50 {
            Self::High
        } else {
            Self::Critical
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}
