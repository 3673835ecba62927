//! Backup policy coverage and restore feasibility.

pub mod coverage;
pub mod simulate;

pub use coverage::{NamespaceCoverage, covers, namespace_coverage, resolve_coverage};
pub use simulate::simulate;
