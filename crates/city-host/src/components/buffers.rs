//! Entity Buffers
//!
//! Fixed-capacity record buffers for trees, buildings and network segments.
//! Slots are reused through a free list; a released slot keeps its index and
//! has its flags cleared, exactly what the respiration scan expects to see.

use bevy_ecs::prelude::*;
use glam::Vec3;
use respiration::flags::{building, segment, tree};
use respiration::{
    BuildingAccess, BuildingInfo, NetInfo, Placement, PopulationAccess, SegmentAccess, SpeciesId,
    StatusFlags, TreeAccess,
};
use std::sync::Arc;

/// A record type stored in an [`EntityBuffer`].
pub trait Slot: Default + Send + Sync + 'static {
    fn flags(&self) -> StatusFlags;
}

/// A standalone tree.
#[derive(Debug, Clone, Default)]
pub struct TreeInstance {
    pub flags: StatusFlags,
    pub species: Option<SpeciesId>,
    pub position: Vec3,
}

impl Slot for TreeInstance {
    fn flags(&self) -> StatusFlags {
        self.flags
    }
}

/// A placed building.
#[derive(Debug, Clone, Default)]
pub struct BuildingInstance {
    pub flags: StatusFlags,
    pub info: Option<Arc<BuildingInfo>>,
    pub placement: Placement,
}

impl Slot for BuildingInstance {
    fn flags(&self) -> StatusFlags {
        self.flags
    }
}

/// A network segment between two nodes.
#[derive(Debug, Clone, Default)]
pub struct SegmentInstance {
    pub flags: StatusFlags,
    pub info: Option<Arc<NetInfo>>,
    pub middle_position: Vec3,
    pub start_node: usize,
    pub end_node: usize,
}

impl Slot for SegmentInstance {
    fn flags(&self) -> StatusFlags {
        self.flags
    }
}

/// Fixed-capacity buffer with a live-record counter.
#[derive(Resource, Debug)]
pub struct EntityBuffer<T: Slot> {
    records: Vec<T>,
    /// Free slot indices, popped from the back.
    free: Vec<usize>,
    live: usize,
}

pub type TreeBuffer = EntityBuffer<TreeInstance>;
pub type BuildingBuffer = EntityBuffer<BuildingInstance>;

impl<T: Slot> EntityBuffer<T> {
    /// Creates an empty buffer of fixed `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: (0..capacity).map(|_| T::default()).collect(),
            free: (0..capacity).rev().collect(),
            live: 0,
        }
    }

    /// Stores a record in the lowest free slot. Returns `None` when full.
    pub fn create(&mut self, record: T) -> Option<usize> {
        let index = self.free.pop()?;
        self.records[index] = record;
        self.live += 1;
        Some(index)
    }

    /// Clears a slot and returns it to the free list.
    pub fn release(&mut self, index: usize) -> bool {
        match self.records.get(index) {
            Some(record) if record.flags() != StatusFlags::NONE => {
                self.records[index] = T::default();
                self.free.push(index);
                self.live -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.records.get_mut(index)
    }

    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    pub fn live(&self) -> usize {
        self.live
    }

    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Indices of occupied slots, ascending.
    pub fn live_indices(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.flags() != StatusFlags::NONE)
            .map(|(index, _)| index)
            .collect()
    }
}

impl TreeBuffer {
    /// Plants a tree; returns its index.
    pub fn plant(&mut self, species: SpeciesId, position: Vec3) -> Option<usize> {
        self.create(TreeInstance {
            flags: tree::CREATED,
            species: Some(species),
            position,
        })
    }
}

impl BuildingBuffer {
    /// Places a finished building; returns its index.
    pub fn place(&mut self, info: Arc<BuildingInfo>, placement: Placement) -> Option<usize> {
        self.create(BuildingInstance {
            flags: building::CREATED | building::COMPLETED,
            info: Some(info),
            placement,
        })
    }
}

impl<T: Slot> PopulationAccess for EntityBuffer<T> {
    fn capacity(&self) -> usize {
        self.records.len()
    }

    fn live_count(&self) -> usize {
        self.live
    }

    fn flags(&self, index: usize) -> StatusFlags {
        self.records[index].flags()
    }
}

impl TreeAccess for TreeBuffer {
    fn species(&self, index: usize) -> Option<&SpeciesId> {
        self.records[index].species.as_ref()
    }

    fn position(&self, index: usize) -> Vec3 {
        self.records[index].position
    }
}

impl BuildingAccess for BuildingBuffer {
    fn info(&self, index: usize) -> Option<&BuildingInfo> {
        self.records[index].info.as_deref()
    }

    fn placement(&self, index: usize) -> Placement {
        self.records[index].placement
    }
}

/// Road network: segment buffer plus node positions.
#[derive(Resource, Debug)]
pub struct NetworkBuffer {
    pub segments: EntityBuffer<SegmentInstance>,
    nodes: Vec<Vec3>,
}

impl NetworkBuffer {
    pub fn with_capacity(segment_capacity: usize) -> Self {
        Self {
            segments: EntityBuffer::with_capacity(segment_capacity),
            nodes: Vec::new(),
        }
    }

    /// Adds a node; returns its id.
    pub fn add_node(&mut self, position: Vec3) -> usize {
        self.nodes.push(position);
        self.nodes.len() - 1
    }

    /// Connects two existing nodes; returns the segment index.
    pub fn connect(&mut self, info: Arc<NetInfo>, start_node: usize, end_node: usize) -> Option<usize> {
        let start = *self.nodes.get(start_node)?;
        let end = *self.nodes.get(end_node)?;
        self.segments.create(SegmentInstance {
            flags: segment::CREATED,
            info: Some(info),
            middle_position: (start + end) * 0.5,
            start_node,
            end_node,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl PopulationAccess for NetworkBuffer {
    fn capacity(&self) -> usize {
        self.segments.capacity()
    }

    fn live_count(&self) -> usize {
        self.segments.live()
    }

    fn flags(&self, index: usize) -> StatusFlags {
        self.segments.records[index].flags
    }
}

impl SegmentAccess for NetworkBuffer {
    fn info(&self, index: usize) -> Option<&NetInfo> {
        self.segments.records[index].info.as_deref()
    }

    fn middle_position(&self, index: usize) -> Vec3 {
        self.segments.records[index].middle_position
    }

    fn nodes(&self, index: usize) -> (usize, usize) {
        let record = &self.segments.records[index];
        (record.start_node, record.end_node)
    }

    fn node_position(&self, node: usize) -> Vec3 {
        self.nodes.get(node).copied().unwrap_or(Vec3::ZERO)
    }
}
