//! Tree respiration: tick-sliced pollution scrubbing.
//!
//! Trees, and the tree props embedded in buildings and road segments, remove
//! pollution around them. Visiting every entity every tick is too expensive,
//! so each population is split into `stride` round-robin slices and one
//! slice is visited per tick. Each visit reports a magnitude scaled up by a
//! strength offset so the long-run effect does not depend on the accuracy.
//!
//! # Architecture
//!
//! ```text
//!              ┌──────────────┐   strides + offset   ┌────────────┐
//!  settings ──▶│   cadence    │ ───────────────────▶ │ scheduler  │
//!  live counts └──────────────┘                      └─────┬──────┘
//!                                                          │ slice
//!  ┌─────────┐   effect    ┌────────────┐   flags match    ▼
//!  │  sink   │ ◀────────── │  species   │ ◀──────── ┌────────────┐
//!  └─────────┘             └────────────┘           │ processors │
//!                                                   └────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cadence`]: Stride and strength offset derivation
//! - [`scheduler`]: Per-tick index slices
//! - [`flags`]: Status flag filters
//! - [`processors`]: Tree, building and segment processing
//! - [`species`]: Species effect cache and effect application
//! - [`host`]: Capabilities the host simulation provides
//! - [`config`]: Settings, store and TOML configuration

pub mod cadence;
pub mod config;
pub mod flags;
pub mod host;
pub mod processors;
pub mod scheduler;
pub mod species;

// Re-export cadence types
pub use cadence::{next_pow2_ge, Cadence, CadenceCalculator, MAX_ACCURACY, MIN_ACCURACY};

// Re-export config types
pub use config::{
    default_config_toml, CadenceConfig, ConfigError, MemorySettingsStore, RespirationConfig,
    RespirationSettings, SettingsStore, TomlSerializeError,
};

// Re-export host types
pub use host::{
    AssetCatalog, BuildingAccess, BuildingInfo, HostView, LaneInfo, LaneProp, NetInfo, Placement,
    PopulationAccess, PropPlacement, RecordingSink, ResourceSink, SegmentAccess, SinkCall,
    SpeciesId, TreeAccess,
};

pub use flags::StatusFlags;
pub use processors::ScanStats;
pub use scheduler::{slice_for, FrameSlice};
pub use species::{EffectApplier, SpeciesEffect, SpeciesEffectCache};

use respiration_events::{Population, PopulationTally};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, trace};

/// Errors that can occur in controller operations.
#[derive(Debug, Error)]
pub enum RespirationError {
    /// Error loading configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// What one call to [`RespirationController::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    pub tick: u64,
    /// Indices checked per population
    pub visited: PopulationTally<u64>,
    /// Records that passed the flag filter
    pub matched: PopulationTally<u64>,
    /// Sink invocations
    pub dumps: PopulationTally<u64>,
}

/// Drives the three population scans, one slice per tick.
///
/// Holds the settings, the current cadence snapshot and the species cache.
/// The cadence is recomputed when settings are applied, when the host calls
/// [`recompute_cadence`](Self::recompute_cadence), and on the optional
/// recheck interval. It never follows population drift on its own: a host
/// whose populations grow should trigger a recompute.
#[derive(Debug)]
pub struct RespirationController {
    settings: RespirationSettings,
    cadence_config: CadenceConfig,
    calculator: CadenceCalculator,
    cadence: Cadence,
    cache: SpeciesEffectCache,
}

impl RespirationController {
    /// Creates a controller and computes its first cadence.
    pub fn new(config: RespirationConfig, host: &HostView<'_>) -> Self {
        let calculator = CadenceCalculator::new();
        let cadence = calculator.recompute(config.settings.simulation_accuracy, live_counts(host));
        let controller = Self {
            settings: config.settings,
            cadence_config: config.cadence,
            calculator,
            cadence,
            cache: SpeciesEffectCache::new(),
        };
        controller.log_cadence();
        controller
    }

    /// Creates a controller from a configuration file.
    pub fn from_config_file(path: &Path, host: &HostView<'_>) -> Result<Self, RespirationError> {
        let config = RespirationConfig::from_file(path)?;
        Ok(Self::new(config, host))
    }

    /// Replaces the settings and recomputes the cadence.
    pub fn apply_settings(&mut self, settings: RespirationSettings, host: &HostView<'_>) {
        self.settings = settings;
        self.recompute_cadence(host);
    }

    /// Re-reads live counts and recomputes strides and strength offset.
    pub fn recompute_cadence(&mut self, host: &HostView<'_>) {
        self.cadence = self
            .calculator
            .recompute(self.settings.simulation_accuracy, live_counts(host));
        self.log_cadence();
    }

    /// Processes this tick's slice of every enabled population.
    pub fn tick(
        &mut self,
        tick_index: u64,
        host: &HostView<'_>,
        sink: &mut dyn ResourceSink,
    ) -> TickSummary {
        let interval = self.cadence_config.recheck_interval_ticks;
        if interval > 0 && tick_index % interval == 0 {
            self.recompute_cadence(host);
        }

        // Read the snapshot once for the whole tick.
        let cadence = self.cadence;
        let mut summary = TickSummary {
            tick: tick_index,
            ..TickSummary::default()
        };

        for population in Population::ALL {
            let multiplier = self.settings.multiplier(population);
            if multiplier <= 0 {
                continue;
            }

            let stride = cadence.stride(population);
            let mut applier =
                EffectApplier::new(&mut self.cache, host.catalog, &mut *sink, multiplier, &cadence);
            let stats = match population {
                Population::Trees => processors::scan_trees(
                    host.trees,
                    slice_for(stride, host.trees.capacity(), tick_index),
                    &mut applier,
                ),
                Population::Buildings => processors::scan_buildings(
                    host.buildings,
                    slice_for(stride, host.buildings.capacity(), tick_index),
                    &mut applier,
                ),
                Population::Segments => processors::scan_segments(
                    host.segments,
                    slice_for(stride, host.segments.capacity(), tick_index),
                    &mut applier,
                ),
            };

            summary.visited[population] = stats.visited;
            summary.matched[population] = stats.matched;
            summary.dumps[population] = applier.calls();
        }

        trace!(
            tick = tick_index,
            visited = summary.visited.total(),
            matched = summary.matched.total(),
            dumps = summary.dumps.total(),
            "respiration tick"
        );
        summary
    }

    fn log_cadence(&self) {
        info!(
            accuracy = self.cadence.accuracy,
            strength_offset = self.cadence.strength_offset,
            stride_trees = self.cadence.strides.trees,
            stride_buildings = self.cadence.strides.buildings,
            stride_segments = self.cadence.strides.segments,
            "Items processed per frame = {}",
            self.cadence.base_divisor
        );
    }

    /// Returns the current settings.
    pub fn settings(&self) -> &RespirationSettings {
        &self.settings
    }

    /// Returns the current cadence snapshot.
    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Returns the species effect cache.
    pub fn species_cache(&self) -> &SpeciesEffectCache {
        &self.cache
    }
}

fn live_counts(host: &HostView<'_>) -> PopulationTally<u64> {
    PopulationTally {
        trees: host.trees.live_count() as u64,
        buildings: host.buildings.live_count() as u64,
        segments: host.segments.live_count() as u64,
    }
}
