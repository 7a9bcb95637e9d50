//! Ledger module containing monthly partitioning, persistence and the
//! request-level orchestrator

pub mod core;
pub mod partition;
pub mod repository;

pub use self::core::*;
pub use partition::*;
pub use repository::*;
