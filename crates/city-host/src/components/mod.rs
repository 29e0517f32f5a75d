//! ECS Resources
//!
//! Host-owned entity buffers, the species catalog, the pollution grid and
//! simulation state.

pub mod buffers;
pub mod catalog;
pub mod pollution;
pub mod world;

pub use buffers::*;
pub use catalog::*;
pub use pollution::*;
pub use world::*;
