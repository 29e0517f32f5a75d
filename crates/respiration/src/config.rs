//! Configuration loading.
//!
//! User settings (three multipliers and the accuracy) live in an external
//! key-value store under stable keys. For standalone runs the same values
//! can be loaded from a TOML file together with the recheck policy.

use respiration_events::Population;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::cadence::{clamp_accuracy, DEFAULT_ACCURACY};

/// Store key of the tree multiplier.
pub const KEY_MULTIPLIER_TREES: &str = "K45_TR_MultiplierTrees";
/// Store key of the building multiplier.
pub const KEY_MULTIPLIER_BUILDINGS: &str = "K45_TR_MultiplierBuildings";
/// Store key of the network multiplier.
pub const KEY_MULTIPLIER_NET: &str = "K45_TR_MultiplierNet";
/// Store key of the accuracy.
pub const KEY_SIMULATION_ACCURACY: &str = "K45_TR_SimulationAccuracy";

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RespirationConfig {
    /// User-tunable settings
    #[serde(default)]
    pub settings: RespirationSettings,
    /// Recompute policy
    #[serde(default)]
    pub cadence: CadenceConfig,
}

impl RespirationConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, TomlSerializeError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// The four persisted user settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespirationSettings {
    /// Tree multiplier; `<= 0` disables the tree scan
    pub multiplier_trees: i32,
    /// Building multiplier; `<= 0` disables the building scan
    pub multiplier_buildings: i32,
    /// Network multiplier; `<= 0` disables the segment scan
    pub multiplier_net: i32,
    /// Accuracy in [1, 12]; out-of-range values are clamped when used
    pub simulation_accuracy: i32,
}

impl Default for RespirationSettings {
    fn default() -> Self {
        Self {
            multiplier_trees: 0,
            multiplier_buildings: 0,
            multiplier_net: 0,
            simulation_accuracy: DEFAULT_ACCURACY,
        }
    }
}

impl RespirationSettings {
    /// Multiplier of one population.
    pub fn multiplier(&self, population: Population) -> i32 {
        match population {
            Population::Trees => self.multiplier_trees,
            Population::Buildings => self.multiplier_buildings,
            Population::Segments => self.multiplier_net,
        }
    }

    /// Whether a population is scanned at all.
    pub fn is_enabled(&self, population: Population) -> bool {
        self.multiplier(population) > 0
    }

    /// Accuracy after clamping.
    pub fn accuracy(&self) -> u32 {
        clamp_accuracy(self.simulation_accuracy)
    }

    /// Reads settings from a store, using defaults for missing keys.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();
        Self {
            multiplier_trees: store
                .get_int(KEY_MULTIPLIER_TREES)
                .unwrap_or(defaults.multiplier_trees),
            multiplier_buildings: store
                .get_int(KEY_MULTIPLIER_BUILDINGS)
                .unwrap_or(defaults.multiplier_buildings),
            multiplier_net: store
                .get_int(KEY_MULTIPLIER_NET)
                .unwrap_or(defaults.multiplier_net),
            simulation_accuracy: store
                .get_int(KEY_SIMULATION_ACCURACY)
                .unwrap_or(defaults.simulation_accuracy),
        }
    }

    /// Writes all four settings to a store.
    pub fn save(&self, store: &mut dyn SettingsStore) {
        store.set_int(KEY_MULTIPLIER_TREES, self.multiplier_trees);
        store.set_int(KEY_MULTIPLIER_BUILDINGS, self.multiplier_buildings);
        store.set_int(KEY_MULTIPLIER_NET, self.multiplier_net);
        store.set_int(KEY_SIMULATION_ACCURACY, self.simulation_accuracy);
    }
}

/// When strides are recomputed besides explicit triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    /// Re-read live counts every N ticks; 0 recomputes only on request
    pub recheck_interval_ticks: u64,
}

/// Integer key-value settings storage.
pub trait SettingsStore {
    fn get_int(&self, key: &str) -> Option<i32>;
    fn set_int(&mut self, key: &str, value: i32);
}

/// In-memory [`SettingsStore`].
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: HashMap<String, i32>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_int(&self, key: &str) -> Option<i32> {
        self.values.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Error that can occur during TOML serialization.
#[derive(Debug, Error)]
#[error("TOML serialize error: {0}")]
pub struct TomlSerializeError(#[from] pub toml::ser::Error);

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Tree respiration configuration

[settings]
# Per-population multipliers; 0 disables the population
multiplier_trees = 0
multiplier_buildings = 0
multiplier_net = 0
# 1 (fast, coarse) to 12 (slow, fine)
simulation_accuracy = 5

[cadence]
# Re-read population sizes every N ticks; 0 = only on request
recheck_interval_ticks = 0
"#
    .to_string()
}
