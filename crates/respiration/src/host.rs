//! Host capabilities.
//!
//! The host simulation owns the entity buffers, the asset catalog and the
//! resource sink. The scheduler and processors only see them through the
//! traits in this module, so they can run against synthetic populations.

use glam::{Quat, Vec3};
use respiration_events::ResourceKind;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::flags::StatusFlags;

/// Identity of a tree species; effect entries are cached by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub String);

impl SpeciesId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A prop embedded in a building model, relative to the building origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropPlacement {
    /// Set when the prop is a tree.
    pub tree: Option<SpeciesId>,
    pub position: Vec3,
}

/// Building model info.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingInfo {
    pub name: String,
    pub props: Option<Vec<PropPlacement>>,
}

/// A prop placed along a lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneProp {
    pub tree: Option<SpeciesId>,
}

/// One lane of a network model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneInfo {
    pub props: Option<Vec<LaneProp>>,
}

/// Network segment model info.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetInfo {
    pub name: String,
    pub lanes: Option<Vec<LaneInfo>>,
}

/// Position and heading of a building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec3,
    /// Heading in radians, turning about the down axis.
    pub angle: f32,
}

impl Placement {
    pub fn new(position: Vec3, angle: f32) -> Self {
        Self { position, angle }
    }

    /// World position of a point given relative to this placement.
    pub fn world_position(&self, relative: Vec3) -> Vec3 {
        self.position + Quat::from_axis_angle(Vec3::NEG_Y, self.angle) * relative
    }
}

/// Read access shared by all three entity buffers.
pub trait PopulationAccess {
    /// Fixed buffer length; the scheduler iterates `[0, capacity)`.
    fn capacity(&self) -> usize;

    /// Current number of live records. Only read when the cadence is
    /// recomputed.
    fn live_count(&self) -> usize;

    fn flags(&self, index: usize) -> StatusFlags;
}

pub trait TreeAccess: PopulationAccess {
    fn species(&self, index: usize) -> Option<&SpeciesId>;
    fn position(&self, index: usize) -> Vec3;
}

pub trait BuildingAccess: PopulationAccess {
    fn info(&self, index: usize) -> Option<&BuildingInfo>;
    fn placement(&self, index: usize) -> Placement;
}

pub trait SegmentAccess: PopulationAccess {
    fn info(&self, index: usize) -> Option<&NetInfo>;
    fn middle_position(&self, index: usize) -> Vec3;
    /// Start and end node ids of a segment.
    fn nodes(&self, index: usize) -> (usize, usize);
    fn node_position(&self, node: usize) -> Vec3;
}

/// Species geometry lookup.
pub trait AssetCatalog {
    /// Bounding-box size of the species' primary mesh.
    fn mesh_extent(&self, species: &SpeciesId) -> Option<Vec3>;

    /// Bounding-box size of the low-detail fallback mesh.
    fn lod_mesh_extent(&self, species: &SpeciesId) -> Option<Vec3>;
}

/// Receiver of computed effects. Calls are one-way.
pub trait ResourceSink {
    fn dump(&mut self, kind: ResourceKind, amount: i32, unused: i32, position: Vec3, radius: f32);
}

/// Everything the controller needs from the host for one call.
#[derive(Clone, Copy)]
pub struct HostView<'a> {
    pub trees: &'a dyn TreeAccess,
    pub buildings: &'a dyn BuildingAccess,
    pub segments: &'a dyn SegmentAccess,
    pub catalog: &'a dyn AssetCatalog,
}

/// One call received by a [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkCall {
    pub kind: ResourceKind,
    pub amount: i32,
    pub position: Vec3,
    pub radius: f32,
}

/// Sink that keeps every call, for audits and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all recorded amounts.
    pub fn total_amount(&self) -> i64 {
        self.calls.iter().map(|c| c.amount as i64).sum()
    }
}

impl ResourceSink for RecordingSink {
    fn dump(&mut self, kind: ResourceKind, amount: i32, _unused: i32, position: Vec3, radius: f32) {
        self.calls.push(SinkCall {
            kind,
            amount,
            position,
            radius,
        });
    }
}
