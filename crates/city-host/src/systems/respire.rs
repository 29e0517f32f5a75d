//! Respiration System
//!
//! Hands the host buffers to the respiration controller once per tick, with
//! the pollution grid as the resource sink.

use bevy_ecs::prelude::*;
use respiration::HostView;

use crate::components::{
    BuildingBuffer, NetworkBuffer, PollutionGrid, RespirationState, SimulationState,
    SpeciesCatalog, TreeBuffer,
};

/// Runs one respiration tick.
pub fn run_respiration(
    sim_state: Res<SimulationState>,
    trees: Res<TreeBuffer>,
    buildings: Res<BuildingBuffer>,
    network: Res<NetworkBuffer>,
    catalog: Res<SpeciesCatalog>,
    mut grid: ResMut<PollutionGrid>,
    mut respiration: ResMut<RespirationState>,
) {
    let host = HostView {
        trees: &*trees,
        buildings: &*buildings,
        segments: &*network,
        catalog: &*catalog,
    };
    let state = &mut *respiration;

    if state.cadence_dirty {
        state.controller.recompute_cadence(&host);
        state.cadence_dirty = false;
    }

    grid.set_tick(sim_state.current_tick);
    let summary = state
        .controller
        .tick(sim_state.current_tick, &host, &mut *grid);
    state.record(summary);
}

