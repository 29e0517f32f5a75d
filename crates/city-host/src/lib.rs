//! Synthetic City Host Library
//!
//! A small `bevy_ecs` city that owns tree, building and road buffers, a
//! species catalog and a pollution grid, and drives the respiration
//! controller once per tick.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use respiration::{HostView, RespirationConfig, RespirationController};

pub mod components;
pub mod error;
pub mod setup;
pub mod systems;

pub use components::*;
pub use error::SimError;
pub use setup::{generate_city, City, CityParams, MAP_SIZE};

use systems::{emit_background_pollution, fell_trees, plant_trees, run_respiration};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

/// Everything needed to build a host world besides the respiration config.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub seed: u64,
    pub city: CityParams,
    pub growth: GrowthConfig,
    /// Pollution grid cells per side
    pub grid_resolution: usize,
    /// Keep a record of every sink call for the dump log
    pub record_dumps: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            city: CityParams::default(),
            growth: GrowthConfig::default(),
            grid_resolution: 64,
            record_dumps: false,
        }
    }
}

/// Generates the city and inserts every resource the schedule needs.
pub fn build_world(config: RespirationConfig, host: &HostConfig) -> World {
    let mut rng = SmallRng::seed_from_u64(host.seed);
    let city = generate_city(&host.city, &mut rng);

    let controller = RespirationController::new(
        config,
        &HostView {
            trees: &city.trees,
            buildings: &city.buildings,
            segments: &city.network,
            catalog: &city.catalog,
        },
    );

    let resolution = host.grid_resolution.max(1);
    let mut grid = PollutionGrid::new(resolution, MAP_SIZE / resolution as f32);
    if host.record_dumps {
        grid = grid.with_recording();
    }

    let mut world = World::new();
    world.insert_resource(SimulationState::default());
    world.insert_resource(SimRng(rng));
    world.insert_resource(host.growth.clone());
    world.insert_resource(city.catalog);
    world.insert_resource(city.trees);
    world.insert_resource(city.buildings);
    world.insert_resource(city.network);
    world.insert_resource(grid);
    world.insert_resource(RespirationState::new(controller));
    world
}

/// Planting, felling, emission, then respiration, in that order every tick.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            plant_trees,
            fell_trees,
            emit_background_pollution,
            run_respiration,
        )
            .chain(),
    );
    schedule
}

/// Runs one tick with the given index.
pub fn step(world: &mut World, schedule: &mut Schedule, tick: u64) {
    world.resource_mut::<SimulationState>().current_tick = tick;
    schedule.run(world);
}
