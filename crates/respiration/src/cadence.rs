//! Cadence calculation.
//!
//! Derives, from the accuracy setting and the live population sizes, how
//! many ticks apart each index of a population is revisited (its stride)
//! and how much each visit's magnitude is scaled to compensate.

use respiration_events::{Population, PopulationTally};
use serde::{Deserialize, Serialize};

/// Highest accepted accuracy value.
pub const MAX_ACCURACY: i32 = 12;
/// Lowest accepted accuracy value.
pub const MIN_ACCURACY: i32 = 1;
/// Accuracy used when nothing has been configured.
pub const DEFAULT_ACCURACY: i32 = 5;

/// Clamps a raw accuracy value into `[MIN_ACCURACY, MAX_ACCURACY]`.
pub fn clamp_accuracy(accuracy: i32) -> u32 {
    accuracy.clamp(MIN_ACCURACY, MAX_ACCURACY) as u32
}

/// Smallest power of two that is `>= n`; both 0 and 1 yield 1.
pub fn next_pow2_ge(n: u64) -> u64 {
    n.max(1).next_power_of_two()
}

/// Nominal number of entities processed per tick: `2^(accuracy + 3)`.
pub fn base_divisor(accuracy: i32) -> u64 {
    1u64 << (clamp_accuracy(accuracy) + 3)
}

/// Stride for a population of `live_count` entities.
///
/// Always a power of two and never less than `live_count / base_divisor`.
pub fn stride_for(accuracy: i32, live_count: u64) -> u64 {
    next_pow2_ge(live_count.div_ceil(base_divisor(accuracy)))
}

/// Magnitude compensation: `2^(12 - accuracy)`.
pub fn strength_offset(accuracy: i32) -> u64 {
    1u64 << (MAX_ACCURACY as u32 - clamp_accuracy(accuracy))
}

/// Snapshot of everything the scheduler reads on a tick.
///
/// Replaced as a whole on recompute so a stride is never paired with an
/// offset derived from a different accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    /// Clamped accuracy the snapshot was derived from.
    pub accuracy: u32,
    pub base_divisor: u64,
    pub strides: PopulationTally<u64>,
    pub strength_offset: u64,
}

impl Cadence {
    /// Stride of one population.
    pub fn stride(&self, population: Population) -> u64 {
        self.strides[population]
    }
}

/// Computes [`Cadence`] snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct CadenceCalculator;

impl CadenceCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Derives strides for all three populations and the strength offset.
    pub fn recompute(&self, accuracy: i32, live_counts: PopulationTally<u64>) -> Cadence {
        Cadence {
            accuracy: clamp_accuracy(accuracy),
            base_divisor: base_divisor(accuracy),
            strides: PopulationTally::from_fn(|p| stride_for(accuracy, live_counts[p])),
            strength_offset: strength_offset(accuracy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_pow2_boundaries() {
        assert_eq!(next_pow2_ge(0), 1);
        assert_eq!(next_pow2_ge(1), 1);
        assert_eq!(next_pow2_ge(2), 2);
        assert_eq!(next_pow2_ge(3), 4);
        assert_eq!(next_pow2_ge(4), 4);
        assert_eq!(next_pow2_ge(5), 8);
        assert_eq!(next_pow2_ge(1 << 20), 1 << 20);
    }

    #[test]
    fn test_accuracy_is_clamped() {
        assert_eq!(clamp_accuracy(-3), 1);
        assert_eq!(clamp_accuracy(0), 1);
        assert_eq!(clamp_accuracy(7), 7);
        assert_eq!(clamp_accuracy(99), 12);
        assert_eq!(base_divisor(0), base_divisor(1));
        assert_eq!(strength_offset(40), strength_offset(12));
    }

    #[test]
    fn test_reference_values_at_default_accuracy() {
        assert_eq!(base_divisor(5), 256);
        assert_eq!(stride_for(5, 1000), 4);
        assert_eq!(strength_offset(5), 128);
    }

    #[test]
    fn test_small_population_is_visited_every_tick() {
        assert_eq!(stride_for(5, 0), 1);
        assert_eq!(stride_for(5, 255), 1);
        assert_eq!(stride_for(5, 256), 1);
        assert_eq!(stride_for(5, 257), 2);
    }

    #[test]
    fn test_stride_properties_over_grid() {
        let counts = [0u64, 1, 7, 255, 256, 1000, 1279, 4096, 65_535, 262_144, 1_000_003];
        for accuracy in MIN_ACCURACY..=MAX_ACCURACY {
            let divisor = base_divisor(accuracy);
            for &n in &counts {
                let stride = stride_for(accuracy, n);
                assert!(stride >= 1);
                assert!(stride.is_power_of_two(), "stride {} not a power of two", stride);
                assert!(
                    stride * divisor >= n,
                    "stride {} too small for n={} at accuracy {}",
                    stride,
                    n,
                    accuracy
                );
            }
        }
    }

    #[test]
    fn test_higher_accuracy_means_smaller_offset() {
        for accuracy in MIN_ACCURACY..MAX_ACCURACY {
            assert_eq!(strength_offset(accuracy), strength_offset(accuracy + 1) * 2);
        }
        assert_eq!(strength_offset(MAX_ACCURACY), 1);
    }

    #[test]
    fn test_recompute_snapshot() {
        let calculator = CadenceCalculator::new();
        let live = PopulationTally {
            trees: 1000,
            buildings: 10,
            segments: 3000,
        };

        let cadence = calculator.recompute(5, live);

        assert_eq!(cadence.accuracy, 5);
        assert_eq!(cadence.base_divisor, 256);
        assert_eq!(cadence.stride(Population::Trees), 4);
        assert_eq!(cadence.stride(Population::Buildings), 1);
        assert_eq!(cadence.stride(Population::Segments), 16);
        assert_eq!(cadence.strength_offset, 128);
    }
}
