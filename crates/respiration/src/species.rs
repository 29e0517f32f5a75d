//! Species effect cache and effect application.
//!
//! The (magnitude, radius) pair of a species is derived from its mesh
//! extent the first time the species is seen and reused from then on.
//! Entries are never invalidated.

use glam::Vec3;
use respiration_events::ResourceKind;
use std::collections::HashMap;
use tracing::debug;

use crate::cadence::Cadence;
use crate::host::{AssetCatalog, ResourceSink, SpeciesId};

/// Smallest absolute magnitude any species produces.
pub const MIN_MAGNITUDE: i32 = 10;
/// Smallest radius any species produces.
pub const MIN_RADIUS: f32 = 2.0;
/// Fixed divisor applied after multiplier and strength offset.
pub const MAGNITUDE_DIVISOR: i64 = 8;

/// Cached per-species effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesEffect {
    /// Always negative, at least `MIN_MAGNITUDE` in absolute value.
    pub magnitude: i32,
    /// Always at least `MIN_RADIUS`.
    pub radius: f32,
}

impl SpeciesEffect {
    /// Derives the effect from a bounding-box size.
    pub fn from_extent(extent: Vec3) -> Self {
        let diagonal = extent.length();
        // Truncate like an integer cast; NaN maps to 0.
        let diagonal = if diagonal.is_finite() { diagonal as i32 } else { 0 };
        let radius = if extent.y.is_finite() {
            extent.y.max(MIN_RADIUS)
        } else {
            MIN_RADIUS
        };
        Self {
            magnitude: -diagonal.max(MIN_MAGNITUDE),
            radius,
        }
    }

    /// Magnitude reported for one visit: `magnitude * multiplier * offset / 8`.
    ///
    /// Computed in 64 bits, truncated toward zero, saturated into `i32`.
    pub fn applied_magnitude(&self, multiplier: i32, strength_offset: u64) -> i32 {
        let offset = i64::try_from(strength_offset).unwrap_or(i64::MAX);
        let raw = (self.magnitude as i64)
            .saturating_mul(multiplier as i64)
            .saturating_mul(offset)
            / MAGNITUDE_DIVISOR;
        raw.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }
}

/// Memoizes [`SpeciesEffect`] by species identity.
#[derive(Debug, Default)]
pub struct SpeciesEffectCache {
    entries: HashMap<SpeciesId, SpeciesEffect>,
    hits: u64,
    misses: u64,
}

impl SpeciesEffectCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached effect, deriving it from the catalog on a miss.
    pub fn resolve(&mut self, species: &SpeciesId, catalog: &dyn AssetCatalog) -> SpeciesEffect {
        if let Some(effect) = self.entries.get(species) {
            self.hits += 1;
            return *effect;
        }

        self.misses += 1;
        let extent = catalog
            .mesh_extent(species)
            .or_else(|| catalog.lod_mesh_extent(species))
            .unwrap_or(Vec3::ZERO);
        let effect = SpeciesEffect::from_extent(extent);
        debug!(
            species = %species,
            magnitude = effect.magnitude,
            radius = effect.radius,
            "cached species effect"
        );
        self.entries.insert(species.clone(), effect);
        effect
    }

    pub fn get(&self, species: &SpeciesId) -> Option<&SpeciesEffect> {
        self.entries.get(species)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

/// Applies effects for one population scan.
///
/// Borrows the cache, catalog and sink for the duration of the scan and
/// carries the multiplier and strength offset read from the tick's cadence.
pub struct EffectApplier<'a> {
    cache: &'a mut SpeciesEffectCache,
    catalog: &'a dyn AssetCatalog,
    sink: &'a mut dyn ResourceSink,
    multiplier: i32,
    strength_offset: u64,
    calls: u64,
}

impl<'a> EffectApplier<'a> {
    pub fn new(
        cache: &'a mut SpeciesEffectCache,
        catalog: &'a dyn AssetCatalog,
        sink: &'a mut dyn ResourceSink,
        multiplier: i32,
        cadence: &Cadence,
    ) -> Self {
        Self {
            cache,
            catalog,
            sink,
            multiplier,
            strength_offset: cadence.strength_offset,
            calls: 0,
        }
    }

    /// Reports the species' effect at `position` to the sink.
    pub fn apply_effect(&mut self, species: &SpeciesId, position: Vec3) {
        let effect = self.cache.resolve(species, self.catalog);
        let amount = effect.applied_magnitude(self.multiplier, self.strength_offset);
        self.sink
            .dump(ResourceKind::Pollution, amount, 0, position, effect.radius);
        self.calls += 1;
    }

    /// Number of sink calls made so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}
