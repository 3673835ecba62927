pub mod backup;
pub mod error;
pub mod finding;
pub mod inventory;
pub mod quantity;
pub mod remediation;
pub mod report;
pub mod restore;
mod wire;

pub use backup::*;
pub use error::SnapshotError;
pub use finding::*;
pub use inventory::*;
pub use quantity::parse_gib;
pub use remediation::*;
pub use report::*;
pub use restore::*;
