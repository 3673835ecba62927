use std::path::PathBuf;

use drscore::{RecoveryTarget, ScoringProfile};
use tracing::warn;

use crate::error::ScanError;

pub const DEFAULT_MIN_SCORE: i32 = 90;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Compact
        }
    }
}

fn trimmed(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Subscriber settings. They are read on their own so tracing is installed
/// before the rest of the configuration can log a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub filter: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// Reads `DRSCORE_LOG` (falling back to `RUST_LOG`) and `DRSCORE_LOG_FORMAT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let filter = trimmed(&lookup, "DRSCORE_LOG")
            .or_else(|| trimmed(&lookup, "RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let format = trimmed(&lookup, "DRSCORE_LOG_FORMAT")
            .as_deref()
            .map_or(LogFormat::Compact, LogFormat::parse);
        Self { filter, format }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub snapshot: PathBuf,
    pub profile: ScoringProfile,
    pub target: RecoveryTarget,
    pub min_score: i32,
    pub compare: Option<PathBuf>,
}

impl ScanConfig {
    /// Reads `DRSCORE_*` variables; `snapshot_arg` wins over `DRSCORE_SNAPSHOT`.
    pub fn from_env(snapshot_arg: Option<String>) -> Result<Self, ScanError> {
        Self::from_lookup(|name| std::env::var(name).ok(), snapshot_arg)
    }

    /// Same as [`ScanConfig::from_env`] with variables resolved through `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        snapshot_arg: Option<String>,
    ) -> Result<Self, ScanError> {
        let var = |name: &str| trimmed(&lookup, name);

        let snapshot = snapshot_arg
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .or_else(|| var("DRSCORE_SNAPSHOT"))
            .map(PathBuf::from)
            .ok_or_else(|| {
                ScanError::Config(
                    "snapshot path required: pass it as the first argument or set DRSCORE_SNAPSHOT"
                        .to_string(),
                )
            })?;

        let profile = match var("DRSCORE_PROFILE").or_else(|| var("DR_PROFILE")) {
            Some(raw) => {
                if !ScoringProfile::is_known(&raw) {
                    warn!(value = %raw, "unknown scoring profile, using standard");
                }
                ScoringProfile::normalize(&raw)
            }
            None => ScoringProfile::Standard,
        };

        let target = match var("DRSCORE_TARGET") {
            Some(raw) => RecoveryTarget::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "unknown recovery target, using vm");
                RecoveryTarget::Vm
            }),
            None => RecoveryTarget::Vm,
        };

        let min_score = match var("DRSCORE_MIN_SCORE") {
            Some(raw) => match raw.parse::<i32>() {
                Ok(score) if (0..=100).contains(&score) => score,
                _ => {
                    warn!(value = %raw, default = DEFAULT_MIN_SCORE, "invalid min score");
                    DEFAULT_MIN_SCORE
                }
            },
            None => DEFAULT_MIN_SCORE,
        };

        Ok(Self {
            snapshot,
            profile,
            target,
            min_score,
            compare: var("DRSCORE_COMPARE").map(PathBuf::from),
        })
    }
}
