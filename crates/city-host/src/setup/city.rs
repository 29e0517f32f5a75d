//! City Setup
//!
//! Builds a synthetic city: tree species, building and road models, and
//! populated entity buffers laid out on a square map.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use respiration::flags::{building, tree};
use respiration::{
    BuildingInfo, LaneInfo, LaneProp, NetInfo, Placement, PropPlacement, SpeciesId,
};
use std::f32::consts::TAU;
use std::sync::Arc;

use crate::components::{
    BuildingBuffer, NetworkBuffer, SpeciesCatalog, SpeciesGeometry, TreeBuffer,
};

/// Side length of the map in world units.
pub const MAP_SIZE: f32 = 2048.0;

/// Size and layout parameters of a generated city.
#[derive(Debug, Clone)]
pub struct CityParams {
    pub trees: usize,
    pub buildings: usize,
    pub segments: usize,
    /// Extra buffer capacity beyond the initial population, as a fraction
    pub spare_capacity: f32,
    /// Fraction of buildings generated abandoned
    pub abandoned_ratio: f64,
    /// Fraction of trees generated hidden
    pub hidden_ratio: f64,
}

impl Default for CityParams {
    fn default() -> Self {
        Self {
            trees: 20_000,
            buildings: 4_000,
            segments: 3_000,
            spare_capacity: 0.25,
            abandoned_ratio: 0.05,
            hidden_ratio: 0.02,
        }
    }
}

/// Everything the host owns for one city.
#[derive(Debug)]
pub struct City {
    pub catalog: SpeciesCatalog,
    pub trees: TreeBuffer,
    pub buildings: BuildingBuffer,
    pub network: NetworkBuffer,
}

/// Registers the tree species used by the generator.
pub fn create_species_catalog() -> SpeciesCatalog {
    let mut catalog = SpeciesCatalog::new();
    let full = |x: f32, y: f32, z: f32| SpeciesGeometry {
        mesh: Some(Vec3::new(x, y, z)),
        lod_mesh: Some(Vec3::new(x, y, z) * 0.9),
    };

    catalog.register("Oak", full(9.0, 14.0, 9.0));
    catalog.register("Pine", full(5.0, 18.0, 5.0));
    catalog.register("Birch", full(4.0, 11.0, 4.0));
    catalog.register("Conifer", full(6.0, 22.0, 6.0));
    // Low-detail only
    catalog.register(
        "Shrub",
        SpeciesGeometry {
            mesh: None,
            lod_mesh: Some(Vec3::new(2.0, 1.5, 2.0)),
        },
    );
    catalog
}

/// Building models: some embed trees, most embed nothing.
pub fn building_models() -> Vec<Arc<BuildingInfo>> {
    let tree = |name: &str, x: f32, z: f32| PropPlacement {
        tree: Some(SpeciesId::new(name)),
        position: Vec3::new(x, 0.0, z),
    };
    let bench = |x: f32, z: f32| PropPlacement {
        tree: None,
        position: Vec3::new(x, 0.0, z),
    };

    vec![
        Arc::new(BuildingInfo {
            name: "City Park".to_string(),
            props: Some(vec![
                tree("Oak", -12.0, -12.0),
                tree("Oak", 12.0, -12.0),
                tree("Birch", -12.0, 12.0),
                tree("Pine", 12.0, 12.0),
                bench(0.0, 0.0),
            ]),
        }),
        Arc::new(BuildingInfo {
            name: "Suburban House".to_string(),
            props: Some(vec![tree("Birch", 4.0, -6.0), bench(-2.0, 3.0)]),
        }),
        Arc::new(BuildingInfo {
            name: "Office Block".to_string(),
            props: Some(Vec::new()),
        }),
        Arc::new(BuildingInfo {
            name: "Factory".to_string(),
            props: None,
        }),
    ]
}

/// Road models: one with tree lanes, two without.
pub fn net_models() -> Vec<Arc<NetInfo>> {
    vec![
        Arc::new(NetInfo {
            name: "Tree Avenue".to_string(),
            lanes: Some(vec![
                LaneInfo {
                    props: Some(vec![LaneProp {
                        tree: Some(SpeciesId::new("Conifer")),
                    }]),
                },
                LaneInfo { props: None },
                LaneInfo {
                    props: Some(vec![
                        LaneProp { tree: None },
                        LaneProp {
                            tree: Some(SpeciesId::new("Shrub")),
                        },
                    ]),
                },
            ]),
        }),
        Arc::new(NetInfo {
            name: "Two-Lane Road".to_string(),
            lanes: Some(vec![LaneInfo { props: None }, LaneInfo { props: None }]),
        }),
        Arc::new(NetInfo {
            name: "Gravel Path".to_string(),
            lanes: None,
        }),
    ]
}

fn random_position(rng: &mut SmallRng) -> Vec3 {
    let half = MAP_SIZE * 0.5;
    Vec3::new(rng.gen_range(-half..half), 0.0, rng.gen_range(-half..half))
}

fn with_spare(count: usize, spare: f32) -> usize {
    count + (count as f32 * spare.max(0.0)).ceil() as usize
}

/// Generates a city with the requested populations.
pub fn generate_city(params: &CityParams, rng: &mut SmallRng) -> City {
    let catalog = create_species_catalog();
    let species = catalog.species_ids();

    let mut trees = TreeBuffer::with_capacity(with_spare(params.trees, params.spare_capacity));
    for _ in 0..params.trees {
        let id = species[rng.gen_range(0..species.len())].clone();
        if let Some(index) = trees.plant(id, random_position(rng)) {
            if rng.gen_bool(params.hidden_ratio.clamp(0.0, 1.0)) {
                if let Some(record) = trees.get_mut(index) {
                    record.flags |= tree::HIDDEN;
                }
            }
        }
    }

    let models = building_models();
    let mut buildings =
        BuildingBuffer::with_capacity(with_spare(params.buildings, params.spare_capacity));
    for _ in 0..params.buildings {
        let info = models[rng.gen_range(0..models.len())].clone();
        let placement = Placement::new(random_position(rng), rng.gen_range(0.0..TAU));
        if let Some(index) = buildings.place(info, placement) {
            if rng.gen_bool(params.abandoned_ratio.clamp(0.0, 1.0)) {
                if let Some(record) = buildings.get_mut(index) {
                    record.flags |= building::ABANDONED;
                }
            }
        }
    }

    let roads = net_models();
    let mut network =
        NetworkBuffer::with_capacity(with_spare(params.segments, params.spare_capacity));
    let mut previous = network.add_node(random_position(rng));
    for _ in 0..params.segments {
        let next = network.add_node(random_position(rng));
        let info = roads[rng.gen_range(0..roads.len())].clone();
        network.connect(info, previous, next);
        previous = next;
    }

    City {
        catalog,
        trees,
        buildings,
        network,
    }
}

/// Plants up to `count` random trees; returns how many fit.
pub fn plant_random_trees(
    trees: &mut TreeBuffer,
    catalog: &SpeciesCatalog,
    count: usize,
    rng: &mut SmallRng,
) -> usize {
    let species = catalog.species_ids();
    if species.is_empty() {
        return 0;
    }
    let mut planted = 0;
    for _ in 0..count {
        let id = species[rng.gen_range(0..species.len())].clone();
        if trees.plant(id, random_position(rng)).is_none() {
            break;
        }
        planted += 1;
    }
    planted
}

/// Cuts down up to `count` live trees chosen at random; returns how many fell.
pub fn fell_random_trees(trees: &mut TreeBuffer, count: usize, rng: &mut SmallRng) -> usize {
    let live = trees.live_indices();
    let chosen: Vec<usize> = live.choose_multiple(rng, count).copied().collect();
    chosen.into_iter().filter(|&index| trees.release(index)).count()
}
