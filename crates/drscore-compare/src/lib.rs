//! Compares two assessment reports: score movement, finding churn and
//! coverage changes between scans.

pub mod diff;
pub mod trend;

pub use diff::{DomainDelta, ReportDiff, SetChange, diff};
pub use trend::{Direction, Trend};
