//! Species Catalog
//!
//! Mesh extents of every tree species known to the city.

use bevy_ecs::prelude::*;
use glam::Vec3;
use respiration::{AssetCatalog, SpeciesId};
use std::collections::BTreeMap;

/// Bounding-box sizes of a species' meshes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeciesGeometry {
    pub mesh: Option<Vec3>,
    pub lod_mesh: Option<Vec3>,
}

/// Resource: all registered tree species.
#[derive(Resource, Debug, Default)]
pub struct SpeciesCatalog {
    species: BTreeMap<SpeciesId, SpeciesGeometry>,
}

impl SpeciesCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, geometry: SpeciesGeometry) -> SpeciesId {
        let id = SpeciesId::new(name);
        self.species.insert(id.clone(), geometry);
        id
    }

    /// Registered ids in name order.
    pub fn species_ids(&self) -> Vec<SpeciesId> {
        self.species.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

impl AssetCatalog for SpeciesCatalog {
    fn mesh_extent(&self, species: &SpeciesId) -> Option<Vec3> {
        self.species.get(species).and_then(|g| g.mesh)
    }

    fn lod_mesh_extent(&self, species: &SpeciesId) -> Option<Vec3> {
        self.species.get(species).and_then(|g| g.lod_mesh)
    }
}
