//! Frame slice scheduling.
//!
//! Tick `t` visits the residue class `t mod stride` of a population's index
//! space, so over `stride` consecutive ticks every index in `[0, capacity)`
//! is visited exactly once.

/// Indices a population visits on one tick.
#[derive(Debug, Clone)]
pub struct FrameSlice {
    next: usize,
    stride: usize,
    capacity: usize,
}

impl FrameSlice {
    /// First index of the slice (the residue class being visited).
    pub fn offset(&self) -> usize {
        self.next
    }

    /// Distance between consecutive indices.
    pub fn stride(&self) -> usize {
        self.stride
    }
}

impl Iterator for FrameSlice {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next >= self.capacity {
            return None;
        }
        let index = self.next;
        self.next = self.next.saturating_add(self.stride);
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next >= self.capacity {
            0
        } else {
            (self.capacity - self.next).div_ceil(self.stride)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameSlice {}

/// Slice of `[0, capacity)` visited on `tick_index` for the given stride.
///
/// A stride of 0 is treated as 1.
pub fn slice_for(stride: u64, capacity: usize, tick_index: u64) -> FrameSlice {
    let stride = stride.max(1);
    // Offset is < stride, and stride only exceeds usize::MAX when capacity
    // cannot be reached anyway.
    let offset = usize::try_from(tick_index % stride).unwrap_or(usize::MAX);
    FrameSlice {
        next: offset,
        stride: usize::try_from(stride).unwrap_or(usize::MAX),
        capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_one_visits_everything() {
        let indices: Vec<usize> = slice_for(1, 5, 17).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_slice_follows_tick_residue() {
        let indices: Vec<usize> = slice_for(4, 10, 6).collect();
        assert_eq!(indices, vec![2, 6]);
    }

    #[test]
    fn test_zero_stride_is_treated_as_one() {
        assert_eq!(slice_for(0, 3, 9).count(), 3);
    }

    #[test]
    fn test_empty_capacity() {
        assert_eq!(slice_for(8, 0, 3).count(), 0);
    }

    #[test]
    fn test_offset_past_capacity_is_empty() {
        let slice = slice_for(16, 4, 9);
        assert_eq!(slice.offset(), 9);
        assert_eq!(slice.len(), 0);
        assert_eq!(slice.count(), 0);
    }

    #[test]
    fn test_exact_len() {
        for tick in 0..8 {
            let slice = slice_for(8, 61, tick);
            let expected = slice.clone().count();
            assert_eq!(slice.len(), expected);
        }
    }

    #[test]
    fn test_round_robin_completeness() {
        for stride in [1u64, 2, 4, 8, 32] {
            for capacity in [0usize, 1, 3, 31, 32, 33, 1000] {
                let mut seen = vec![0u32; capacity];
                // Start mid-stream; any window of `stride` ticks must cover.
                for tick in 1_000..1_000 + stride {
                    for index in slice_for(stride, capacity, tick) {
                        seen[index] += 1;
                    }
                }
                assert!(
                    seen.iter().all(|&c| c == 1),
                    "stride {} capacity {} visited {:?}",
                    stride,
                    capacity,
                    seen
                );
            }
        }
    }

    #[test]
    fn test_per_tick_work_is_bounded() {
        // 65536 slots at stride 256 => 256 checks per tick.
        for tick in 0..256 {
            assert_eq!(slice_for(256, 65_536, tick).len(), 256);
        }
    }
}
