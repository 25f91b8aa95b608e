//! Caller capabilities
//!
//! The session store keeps a caller's permissions as a `u32` bitmask. It is
//! decoded exactly once per request into a [`CapabilitySet`], and every gate
//! check afterwards is a named membership test rather than bit arithmetic.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single named permission grant.
///
/// The discriminant is the bit position in the stored permission mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// May use the map at all (coarse axis for every map category)
    ViewMap = 0,
    ViewMapRaid = 1,
    ViewMapPokemon = 2,
    ViewStats = 3,
    /// Fleet management: devices, instances, assignments
    AdminSetting = 4,
    AdminUser = 5,
    ViewMapGym = 6,
    ViewMapPokestop = 7,
    ViewMapSpawnpoint = 8,
    ViewMapQuest = 9,
}

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::ViewMap,
        Capability::ViewMapRaid,
        Capability::ViewMapPokemon,
        Capability::ViewStats,
        Capability::AdminSetting,
        Capability::AdminUser,
        Capability::ViewMapGym,
        Capability::ViewMapPokestop,
        Capability::ViewMapSpawnpoint,
        Capability::ViewMapQuest,
    ];

    /// Bit position of this capability in the stored mask.
    pub fn bit(self) -> u32 {
        self as u32
    }

    /// Map a bit position back to its capability. Unknown positions are `None`.
    pub fn from_bit(bit: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.bit() == bit)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::ViewMap => "ViewMap",
            Capability::ViewMapRaid => "ViewMapRaid",
            Capability::ViewMapPokemon => "ViewMapPokemon",
            Capability::ViewStats => "ViewStats",
            Capability::AdminSetting => "AdminSetting",
            Capability::AdminUser => "AdminUser",
            Capability::ViewMapGym => "ViewMapGym",
            Capability::ViewMapPokestop => "ViewMapPokestop",
            Capability::ViewMapSpawnpoint => "ViewMapSpawnpoint",
            Capability::ViewMapQuest => "ViewMapQuest",
        };
        f.write_str(name)
    }
}

/// Immutable set of capabilities held by one caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    /// The set held by an unauthenticated caller.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode a session permission mask.
    ///
    /// Total: a missing mask yields the empty set, and bits with no known
    /// capability are ignored so older builds accept newer masks.
    pub fn decode(mask: Option<u32>) -> Self {
        let Some(mask) = mask else {
            return Self::empty();
        };

        Self(
            (0..u32::BITS)
                .filter(|bit| mask & (1 << bit) != 0)
                .filter_map(Capability::from_bit)
                .collect(),
        )
    }

    /// Encode back into the stored mask form.
    pub fn to_mask(&self) -> u32 {
        self.0.iter().fold(0, |mask, c| mask | (1 << c.bit()))
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
