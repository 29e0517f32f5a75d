//! City Setup
//!
//! Species, models and initial populations.

pub mod city;

pub use city::*;
