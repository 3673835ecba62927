use drscore::model::SnapshotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("config error: {0}")]
    Config(String),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
