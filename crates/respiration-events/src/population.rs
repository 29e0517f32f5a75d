//! Population Types
//!
//! The three independently scheduled entity collections and per-population
//! counters.
//!
//! # Example
//!
//! ```
//! use respiration_events::Population;
//!
//! let pop: Population = "segments".parse().unwrap();
//! assert_eq!(pop, Population::Segments);
//! assert_eq!(pop.to_string(), "segments");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// One of the three entity collections scanned by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Population {
    Trees,
    Buildings,
    Segments,
}

impl Population {
    /// All populations, in the order they are processed each tick.
    pub const ALL: [Population; 3] = [
        Population::Trees,
        Population::Buildings,
        Population::Segments,
    ];

    /// Returns a dense index usable for fixed-size per-population arrays.
    pub const fn index(self) -> usize {
        match self {
            Population::Trees => 0,
            Population::Buildings => 1,
            Population::Segments => 2,
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Population::Trees => write!(f, "trees"),
            Population::Buildings => write!(f, "buildings"),
            Population::Segments => write!(f, "segments"),
        }
    }
}

/// Error type for parsing a Population from a string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsePopulationError(pub String);

impl fmt::Display for ParsePopulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid population: '{}', expected trees, buildings or segments",
            self.0
        )
    }
}

impl std::error::Error for ParsePopulationError {}

impl FromStr for Population {
    type Err = ParsePopulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trees" | "tree" => Ok(Population::Trees),
            "buildings" | "building" => Ok(Population::Buildings),
            "segments" | "segment" | "net" | "nets" => Ok(Population::Segments),
            _ => Err(ParsePopulationError(s.to_string())),
        }
    }
}

/// A value kept per population, addressable by [`Population`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationTally<T> {
    pub trees: T,
    pub buildings: T,
    pub segments: T,
}

impl<T: Copy> PopulationTally<T> {
    /// Creates a tally with the same value for every population.
    pub fn splat(value: T) -> Self {
        Self {
            trees: value,
            buildings: value,
            segments: value,
        }
    }

    /// Creates a tally from a function of the population.
    pub fn from_fn(mut f: impl FnMut(Population) -> T) -> Self {
        Self {
            trees: f(Population::Trees),
            buildings: f(Population::Buildings),
            segments: f(Population::Segments),
        }
    }

    /// Iterates `(population, value)` pairs in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (Population, T)> + '_ {
        Population::ALL.into_iter().map(move |p| (p, self[p]))
    }
}

impl PopulationTally<u64> {
    /// Sum over all three populations.
    pub fn total(&self) -> u64 {
        self.trees + self.buildings + self.segments
    }
}

impl<T> Index<Population> for PopulationTally<T> {
    type Output = T;

    fn index(&self, population: Population) -> &T {
        match population {
            Population::Trees => &self.trees,
            Population::Buildings => &self.buildings,
            Population::Segments => &self.segments,
        }
    }
}

impl<T> IndexMut<Population> for PopulationTally<T> {
    fn index_mut(&mut self, population: Population) -> &mut T {
        match population {
            Population::Trees => &mut self.trees,
            Population::Buildings => &mut self.buildings,
            Population::Segments => &mut self.segments,
        }
    }
}
