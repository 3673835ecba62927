//! Check functions, one module per scoring domain.

pub mod backup;
pub mod config;
pub mod storage;
pub mod workload;
