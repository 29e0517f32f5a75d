//! Per-record processing.
//!
//! Each processor receives one record that already passed the flag filter,
//! finds the tree occurrences it embeds and hands them to the
//! [`EffectApplier`]. Missing models, prop lists and lane lists are the
//! common case and are skipped silently.

use respiration_events::Population;

use crate::flags::is_canonical;
use crate::host::{BuildingAccess, PopulationAccess, SegmentAccess, TreeAccess};
use crate::scheduler::FrameSlice;
use crate::species::EffectApplier;

/// Counters for one population scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Indices checked.
    pub visited: u64,
    /// Records whose flags matched.
    pub matched: u64,
}

/// A standalone tree.
pub fn process_tree(trees: &dyn TreeAccess, index: usize, applier: &mut EffectApplier<'_>) {
    if let Some(species) = trees.species(index) {
        applier.apply_effect(species, trees.position(index));
    }
}

/// Every tree prop of a building model, at its transformed world position.
pub fn process_building(
    buildings: &dyn BuildingAccess,
    index: usize,
    applier: &mut EffectApplier<'_>,
) {
    let Some(props) = buildings.info(index).and_then(|info| info.props.as_deref()) else {
        return;
    };
    if props.is_empty() {
        return;
    }

    let placement = buildings.placement(index);
    for prop in props {
        if let Some(tree) = &prop.tree {
            applier.apply_effect(tree, placement.world_position(prop.position));
        }
    }
}

/// Every tree lane prop of a segment, applied at the midpoint and at both
/// end nodes.
pub fn process_segment(segments: &dyn SegmentAccess, index: usize, applier: &mut EffectApplier<'_>) {
    let Some(lanes) = segments.info(index).and_then(|info| info.lanes.as_deref()) else {
        return;
    };

    let mut anchors = None;
    for lane in lanes {
        let Some(props) = lane.props.as_deref() else {
            continue;
        };
        for prop in props {
            let Some(tree) = &prop.tree else {
                continue;
            };
            let [middle, start, end] = *anchors.get_or_insert_with(|| {
                let (start_node, end_node) = segments.nodes(index);
                [
                    segments.middle_position(index),
                    segments.node_position(start_node),
                    segments.node_position(end_node),
                ]
            });
            applier.apply_effect(tree, middle);
            applier.apply_effect(tree, start);
            applier.apply_effect(tree, end);
        }
    }
}

fn scan<A: PopulationAccess + ?Sized>(
    population: Population,
    records: &A,
    slice: FrameSlice,
    applier: &mut EffectApplier<'_>,
    mut process: impl FnMut(&A, usize, &mut EffectApplier<'_>),
) -> ScanStats {
    let mut stats = ScanStats::default();
    for index in slice {
        stats.visited += 1;
        if is_canonical(population, records.flags(index)) {
            stats.matched += 1;
            process(records, index, applier);
        }
    }
    stats
}

/// Walks a tree slice.
pub fn scan_trees(
    trees: &dyn TreeAccess,
    slice: FrameSlice,
    applier: &mut EffectApplier<'_>,
) -> ScanStats {
    scan(Population::Trees, trees, slice, applier, |t, i, a| {
        process_tree(t, i, a)
    })
}

/// Walks a building slice.
pub fn scan_buildings(
    buildings: &dyn BuildingAccess,
    slice: FrameSlice,
    applier: &mut EffectApplier<'_>,
) -> ScanStats {
    scan(Population::Buildings, buildings, slice, applier, |b, i, a| {
        process_building(b, i, a)
    })
}

/// Walks a segment slice.
pub fn scan_segments(
    segments: &dyn SegmentAccess,
    slice: FrameSlice,
    applier: &mut EffectApplier<'_>,
) -> ScanStats {
    scan(Population::Segments, segments, slice, applier, |s, i, a| {
        process_segment(s, i, a)
    })
}
