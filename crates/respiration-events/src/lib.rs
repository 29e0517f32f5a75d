//! Shared record types for the tree respiration workspace.
//!
//! This crate contains pure data structures with no scheduling logic.
//! It is a dependency for all other crates in the workspace.

pub mod population;
pub mod record;

// Re-export population types
pub use population::{ParsePopulationError, Population, PopulationTally};

// Re-export record types
pub use record::{DumpRecord, ResourceKind};
