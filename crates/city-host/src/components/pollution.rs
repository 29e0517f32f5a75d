//! Pollution Grid
//!
//! The city's natural-resource map. It is the resource sink the respiration
//! controller reports to: negative pollution amounts are spread over the
//! cells covered by the effect radius.

use bevy_ecs::prelude::*;
use glam::Vec3;
use respiration::ResourceSink;
use respiration_events::{DumpRecord, ResourceKind};

/// Resource: square pollution grid centered on the origin.
#[derive(Resource, Debug)]
pub struct PollutionGrid {
    resolution: usize,
    cell_size: f32,
    cells: Vec<i64>,
    /// Tick stamped on recorded dumps.
    current_tick: u64,
    /// Total amount reported by the sink (negative for removal).
    reported: i64,
    dump_calls: u64,
    recording: Option<Vec<DumpRecord>>,
}

impl PollutionGrid {
    pub fn new(resolution: usize, cell_size: f32) -> Self {
        Self {
            resolution,
            cell_size,
            cells: vec![0; resolution * resolution],
            current_tick: 0,
            reported: 0,
            dump_calls: 0,
            recording: None,
        }
    }

    /// Keeps a [`DumpRecord`] of every sink call from now on.
    pub fn with_recording(mut self) -> Self {
        self.recording = Some(Vec::new());
        self
    }

    pub fn set_tick(&mut self, tick: u64) {
        self.current_tick = tick;
    }

    /// Adds the same pollution to every cell.
    pub fn emit_uniform(&mut self, amount: i64) {
        for cell in &mut self.cells {
            *cell = cell.saturating_add(amount).max(0);
        }
    }

    /// Cell containing a world position, if it lies on the grid.
    pub fn cell_at(&self, position: Vec3) -> Option<usize> {
        let half = self.resolution as f32 * self.cell_size * 0.5;
        let x = ((position.x + half) / self.cell_size).floor();
        let z = ((position.z + half) / self.cell_size).floor();
        let limit = self.resolution as f32;
        if !(0.0..limit).contains(&x) || !(0.0..limit).contains(&z) {
            return None;
        }
        Some(z as usize * self.resolution + x as usize)
    }

    pub fn pollution_at(&self, position: Vec3) -> Option<i64> {
        self.cell_at(position).map(|i| self.cells[i])
    }

    pub fn total_pollution(&self) -> i64 {
        self.cells.iter().sum()
    }

    pub fn reported(&self) -> i64 {
        self.reported
    }

    pub fn dump_calls(&self) -> u64 {
        self.dump_calls
    }

    /// Drains recorded dumps, if recording is on.
    pub fn take_records(&mut self) -> Vec<DumpRecord> {
        self.recording.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn spread(&mut self, amount: i64, position: Vec3, radius: f32) {
        let Some(center) = self.cell_at(position) else {
            return;
        };
        let limit = self.resolution as i64;
        // NaN casts to 0 and infinity saturates; a reach past the grid covers it all.
        let reach = ((radius / self.cell_size).ceil() as i64).clamp(0, limit);
        let (cx, cz) = (
            (center % self.resolution) as i64,
            (center / self.resolution) as i64,
        );
        let xs = (cx - reach).max(0)..=(cx + reach).min(limit - 1);
        let zs = (cz - reach).max(0)..=(cz + reach).min(limit - 1);

        let covered: Vec<usize> = zs
            .flat_map(|z| xs.clone().map(move |x| (x, z)))
            .map(|(x, z)| z as usize * self.resolution + x as usize)
            .collect();
        let share = amount / covered.len() as i64;
        let remainder = amount - share * covered.len() as i64;

        for (i, cell) in covered.iter().enumerate() {
            let extra = if i == 0 { remainder } else { 0 };
            let value = &mut self.cells[*cell];
            *value = value.saturating_add(share + extra).max(0);
        }
    }
}

impl ResourceSink for PollutionGrid {
    fn dump(&mut self, kind: ResourceKind, amount: i32, _unused: i32, position: Vec3, radius: f32) {
        if kind != ResourceKind::Pollution {
            return;
        }
        self.reported += amount as i64;
        self.dump_calls += 1;
        if let Some(records) = self.recording.as_mut() {
            records.push(DumpRecord::pollution(self.current_tick, amount, position, radius));
        }
        self.spread(amount as i64, position, radius);
    }
}
