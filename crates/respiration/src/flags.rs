//! Status flag filtering.
//!
//! Each population has a search mask and a match value. A record is
//! processed only when its masked flags equal the match value exactly, so a
//! record carrying an extra searched bit (hidden, abandoned, flooded...) is
//! excluded even though `CREATED` is set.

use respiration_events::Population;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Raw status bits of a host record.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusFlags(pub u32);

impl StatusFlags {
    pub const NONE: StatusFlags = StatusFlags(0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn union(self, other: StatusFlags) -> StatusFlags {
        StatusFlags(self.0 | other.0)
    }

    pub const fn contains(self, other: StatusFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for StatusFlags {
    type Output = StatusFlags;

    fn bitor(self, rhs: StatusFlags) -> StatusFlags {
        self.union(rhs)
    }
}

impl BitOrAssign for StatusFlags {
    fn bitor_assign(&mut self, rhs: StatusFlags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for StatusFlags {
    type Output = StatusFlags;

    fn bitand(self, rhs: StatusFlags) -> StatusFlags {
        StatusFlags(self.0 & rhs.0)
    }
}

impl fmt::Debug for StatusFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusFlags({:#x})", self.0)
    }
}

/// Tree instance bits.
pub mod tree {
    use super::StatusFlags;

    pub const CREATED: StatusFlags = StatusFlags(1 << 0);
    pub const DELETED: StatusFlags = StatusFlags(1 << 1);
    pub const HIDDEN: StatusFlags = StatusFlags(1 << 2);
    pub const SINGLE: StatusFlags = StatusFlags(1 << 3);
    pub const FIXED_HEIGHT: StatusFlags = StatusFlags(1 << 4);
    pub const BURNING: StatusFlags = StatusFlags(1 << 5);
}

/// Building bits.
pub mod building {
    use super::StatusFlags;

    pub const CREATED: StatusFlags = StatusFlags(1 << 0);
    pub const DELETED: StatusFlags = StatusFlags(1 << 1);
    pub const ORIGINAL: StatusFlags = StatusFlags(1 << 2);
    pub const COMPLETED: StatusFlags = StatusFlags(1 << 10);
    pub const ACTIVE: StatusFlags = StatusFlags(1 << 11);
    pub const ABANDONED: StatusFlags = StatusFlags(1 << 12);
    pub const COLLAPSED: StatusFlags = StatusFlags(1 << 16);
    pub const HIDDEN: StatusFlags = StatusFlags(1 << 19);
    pub const FLOODED: StatusFlags = StatusFlags(1 << 21);
    pub const BURNED_DOWN: StatusFlags = StatusFlags(1 << 26);
}

/// Network segment bits.
pub mod segment {
    use super::StatusFlags;

    pub const CREATED: StatusFlags = StatusFlags(1 << 0);
    pub const DELETED: StatusFlags = StatusFlags(1 << 1);
    pub const ORIGINAL: StatusFlags = StatusFlags(1 << 2);
    pub const COLLAPSED: StatusFlags = StatusFlags(1 << 3);
    pub const INVERT: StatusFlags = StatusFlags(1 << 4);
    pub const FLOODED: StatusFlags = StatusFlags(1 << 22);
}

/// Search mask and exact match value for one population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagFilter {
    pub search: StatusFlags,
    pub matches: StatusFlags,
}

impl FlagFilter {
    /// True when `(flags & search) == matches`.
    pub const fn accepts(&self, flags: StatusFlags) -> bool {
        flags.0 & self.search.0 == self.matches.0
    }
}

pub const TREE_FILTER: FlagFilter = FlagFilter {
    search: tree::CREATED.union(tree::HIDDEN),
    matches: tree::CREATED,
};

pub const BUILDING_FILTER: FlagFilter = FlagFilter {
    search: building::CREATED
        .union(building::ABANDONED)
        .union(building::COLLAPSED)
        .union(building::COMPLETED)
        .union(building::HIDDEN)
        .union(building::FLOODED)
        .union(building::BURNED_DOWN),
    matches: building::CREATED.union(building::COMPLETED),
};

pub const SEGMENT_FILTER: FlagFilter = FlagFilter {
    search: segment::CREATED.union(segment::FLOODED),
    matches: segment::CREATED,
};

/// The filter applied to a population's records.
pub const fn filter_for(population: Population) -> FlagFilter {
    match population {
        Population::Trees => TREE_FILTER,
        Population::Buildings => BUILDING_FILTER,
        Population::Segments => SEGMENT_FILTER,
    }
}

/// Whether a record of `population` with `flags` is fully active.
pub const fn is_canonical(population: Population, flags: StatusFlags) -> bool {
    filter_for(population).accepts(flags)
}
