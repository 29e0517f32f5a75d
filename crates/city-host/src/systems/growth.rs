//! City Growth Systems
//!
//! Periodic tree planting and felling, and the uniform pollution source
//! that keeps the grid from draining to zero.

use bevy_ecs::prelude::*;
use tracing::debug;

use crate::components::{
    GrowthConfig, PollutionGrid, RespirationState, SimulationState, SpeciesCatalog, TreeBuffer,
};
use crate::setup::{fell_random_trees, plant_random_trees};
use crate::SimRng;

/// Plants a batch of trees every planting interval.
///
/// The tree population changes size, so the respiration cadence is marked
/// dirty and recomputed before the next respiration pass.
pub fn plant_trees(
    sim_state: Res<SimulationState>,
    growth: Res<GrowthConfig>,
    catalog: Res<SpeciesCatalog>,
    mut trees: ResMut<TreeBuffer>,
    mut rng: ResMut<SimRng>,
    mut respiration: ResMut<RespirationState>,
) {
    let interval = growth.planting_interval_ticks;
    let tick = sim_state.current_tick;
    if interval == 0 || tick == 0 || tick % interval != 0 {
        return;
    }

    let planted = plant_random_trees(&mut trees, &catalog, growth.trees_per_planting, &mut rng.0);
    if planted > 0 {
        debug!(tick, planted, live = trees.live(), "planted trees");
        respiration.cadence_dirty = true;
    }
}

/// Cuts down a batch of trees every felling interval.
pub fn fell_trees(
    sim_state: Res<SimulationState>,
    growth: Res<GrowthConfig>,
    mut trees: ResMut<TreeBuffer>,
    mut rng: ResMut<SimRng>,
    mut respiration: ResMut<RespirationState>,
) {
    let interval = growth.felling_interval_ticks;
    let tick = sim_state.current_tick;
    if interval == 0 || tick == 0 || tick % interval != 0 {
        return;
    }

    let felled = fell_random_trees(&mut trees, growth.trees_per_felling, &mut rng.0);
    if felled > 0 {
        debug!(tick, felled, live = trees.live(), "felled trees");
        respiration.cadence_dirty = true;
    }
}

/// Adds the configured background pollution to every cell.
pub fn emit_background_pollution(growth: Res<GrowthConfig>, mut grid: ResMut<PollutionGrid>) {
    if growth.emission_per_tick != 0 {
        grid.emit_uniform(growth.emission_per_tick);
    }
}
