//! Vec-backed synthetic host shared by the integration tests.

#![allow(dead_code)]

use glam::Vec3;
use respiration::flags::{building, segment, tree};
use respiration::{
    AssetCatalog, BuildingAccess, BuildingInfo, HostView, LaneInfo, LaneProp, NetInfo, Placement,
    PopulationAccess, PropPlacement, SegmentAccess, SpeciesId, StatusFlags, TreeAccess,
};
use std::cell::RefCell;
use std::collections::HashMap;

pub struct TreeRecord {
    pub flags: StatusFlags,
    pub species: Option<SpeciesId>,
    pub position: Vec3,
}

pub struct BuildingRecord {
    pub flags: StatusFlags,
    pub info: Option<BuildingInfo>,
    pub placement: Placement,
}

pub struct SegmentRecord {
    pub flags: StatusFlags,
    pub info: Option<NetInfo>,
    pub middle: Vec3,
    pub start_node: usize,
    pub end_node: usize,
}

#[derive(Default)]
pub struct TestTrees {
    pub records: Vec<TreeRecord>,
    pub live: usize,
}

#[derive(Default)]
pub struct TestBuildings {
    pub records: Vec<BuildingRecord>,
    pub live: usize,
}

#[derive(Default)]
pub struct TestSegments {
    pub records: Vec<SegmentRecord>,
    pub nodes: Vec<Vec3>,
    pub live: usize,
}

impl PopulationAccess for TestTrees {
    fn capacity(&self) -> usize {
        self.records.len()
    }
    fn live_count(&self) -> usize {
        self.live
    }
    fn flags(&self, index: usize) -> StatusFlags {
        self.records[index].flags
    }
}

impl TreeAccess for TestTrees {
    fn species(&self, index: usize) -> Option<&SpeciesId> {
        self.records[index].species.as_ref()
    }
    fn position(&self, index: usize) -> Vec3 {
        self.records[index].position
    }
}

impl PopulationAccess for TestBuildings {
    fn capacity(&self) -> usize {
        self.records.len()
    }
    fn live_count(&self) -> usize {
        self.live
    }
    fn flags(&self, index: usize) -> StatusFlags {
        self.records[index].flags
    }
}

impl BuildingAccess for TestBuildings {
    fn info(&self, index: usize) -> Option<&BuildingInfo> {
        self.records[index].info.as_ref()
    }
    fn placement(&self, index: usize) -> Placement {
        self.records[index].placement
    }
}

impl PopulationAccess for TestSegments {
    fn capacity(&self) -> usize {
        self.records.len()
    }
    fn live_count(&self) -> usize {
        self.live
    }
    fn flags(&self, index: usize) -> StatusFlags {
        self.records[index].flags
    }
}

impl SegmentAccess for TestSegments {
    fn info(&self, index: usize) -> Option<&NetInfo> {
        self.records[index].info.as_ref()
    }
    fn middle_position(&self, index: usize) -> Vec3 {
        self.records[index].middle
    }
    fn nodes(&self, index: usize) -> (usize, usize) {
        (self.records[index].start_node, self.records[index].end_node)
    }
    fn node_position(&self, node: usize) -> Vec3 {
        self.nodes[node]
    }
}

/// Catalog with fixed extents that counts primary-mesh lookups.
#[derive(Default)]
pub struct TestCatalog {
    pub extents: HashMap<SpeciesId, Vec3>,
    pub lookups: RefCell<HashMap<SpeciesId, u32>>,
}

impl TestCatalog {
    pub fn with(mut self, name: &str, extent: Vec3) -> Self {
        self.extents.insert(SpeciesId::new(name), extent);
        self
    }

    pub fn lookups_of(&self, name: &str) -> u32 {
        self.lookups
            .borrow()
            .get(&SpeciesId::new(name))
            .copied()
            .unwrap_or(0)
    }
}

impl AssetCatalog for TestCatalog {
    fn mesh_extent(&self, species: &SpeciesId) -> Option<Vec3> {
        *self.lookups.borrow_mut().entry(species.clone()).or_insert(0) += 1;
        self.extents.get(species).copied()
    }

    fn lod_mesh_extent(&self, _species: &SpeciesId) -> Option<Vec3> {
        None
    }
}

#[derive(Default)]
pub struct TestHost {
    pub trees: TestTrees,
    pub buildings: TestBuildings,
    pub segments: TestSegments,
    pub catalog: TestCatalog,
}

impl TestHost {
    pub fn view(&self) -> HostView<'_> {
        HostView {
            trees: &self.trees,
            buildings: &self.buildings,
            segments: &self.segments,
            catalog: &self.catalog,
        }
    }
}

pub fn live_tree(species: &str, position: Vec3) -> TreeRecord {
    TreeRecord {
        flags: tree::CREATED,
        species: Some(SpeciesId::new(species)),
        position,
    }
}

pub fn dead_tree() -> TreeRecord {
    TreeRecord {
        flags: StatusFlags::NONE,
        species: None,
        position: Vec3::ZERO,
    }
}

/// `count` live trees of one species laid out along x.
pub fn forest(species: &str, count: usize) -> TestTrees {
    TestTrees {
        records: (0..count)
            .map(|i| live_tree(species, Vec3::new(i as f32, 0.0, 0.0)))
            .collect(),
        live: count,
    }
}

pub fn park(props: Vec<PropPlacement>, placement: Placement) -> BuildingRecord {
    BuildingRecord {
        flags: building::CREATED | building::COMPLETED,
        info: Some(BuildingInfo {
            name: "Park".to_string(),
            props: Some(props),
        }),
        placement,
    }
}

pub fn tree_prop(species: &str, position: Vec3) -> PropPlacement {
    PropPlacement {
        tree: Some(SpeciesId::new(species)),
        position,
    }
}

pub fn avenue(species: &str, middle: Vec3, start_node: usize, end_node: usize) -> SegmentRecord {
    SegmentRecord {
        flags: segment::CREATED,
        info: Some(NetInfo {
            name: "Avenue".to_string(),
            lanes: Some(vec![
                LaneInfo { props: None },
                LaneInfo {
                    props: Some(vec![LaneProp {
                        tree: Some(SpeciesId::new(species)),
                    }]),
                },
            ]),
        }),
        middle,
        start_node,
        end_node,
    }
}
