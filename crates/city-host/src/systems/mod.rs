//! ECS Systems
//!
//! City growth and felling, background emission and the respiration pass.

pub mod growth;
pub mod respire;

pub use growth::{emit_background_pollution, fell_trees, plant_trees};
pub use respire::run_respiration;
