//! Dump Records
//!
//! A serializable trace of one resource sink invocation, written as JSONL by
//! hosts that want to audit what the scheduler reported.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Natural resource kinds a sink accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Pollution,
    Fertility,
    Water,
}

/// One `dump` call as observed by a recording sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpRecord {
    /// Tick the call happened on.
    pub tick: u64,
    pub kind: ResourceKind,
    /// Signed amount; pollution removal is negative.
    pub amount: i32,
    pub position: Vec3,
    pub radius: f32,
}

impl DumpRecord {
    /// Creates a pollution record.
    pub fn pollution(tick: u64, amount: i32, position: Vec3, radius: f32) -> Self {
        Self {
            tick,
            kind: ResourceKind::Pollution,
            amount,
            position,
            radius,
        }
    }

    /// Serializes the record to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a record from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
