//! Simulation State
//!
//! Tick counter, city growth parameters and the respiration controller.

use bevy_ecs::prelude::*;
use respiration::{RespirationController, TickSummary};
use respiration_events::PopulationTally;

/// Resource: global simulation clock.
#[derive(Resource, Debug, Default)]
pub struct SimulationState {
    pub current_tick: u64,
}

/// Resource: how the synthetic city changes while it runs.
#[derive(Resource, Debug, Clone)]
pub struct GrowthConfig {
    /// Ticks between planting rounds; 0 disables planting
    pub planting_interval_ticks: u64,
    /// Trees planted per round
    pub trees_per_planting: usize,
    /// Ticks between felling rounds; 0 disables felling
    pub felling_interval_ticks: u64,
    /// Trees cut down per round
    pub trees_per_felling: usize,
    /// Pollution added to every grid cell each tick
    pub emission_per_tick: i64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            planting_interval_ticks: 256,
            trees_per_planting: 64,
            felling_interval_ticks: 384,
            trees_per_felling: 48,
            emission_per_tick: 1,
        }
    }
}

/// Resource: the respiration controller and its running totals.
#[derive(Resource, Debug)]
pub struct RespirationState {
    pub controller: RespirationController,
    /// Set when a population grew or shrank; the next run recomputes strides
    pub cadence_dirty: bool,
    pub last_summary: TickSummary,
    pub totals: PopulationTally<u64>,
}

impl RespirationState {
    pub fn new(controller: RespirationController) -> Self {
        Self {
            controller,
            cadence_dirty: false,
            last_summary: TickSummary::default(),
            totals: PopulationTally::default(),
        }
    }

    /// Adds a tick's dump counts to the running totals.
    pub fn record(&mut self, summary: TickSummary) {
        for (population, dumps) in summary.dumps.iter() {
            self.totals[population] += dumps;
        }
        self.last_summary = summary;
    }
}
