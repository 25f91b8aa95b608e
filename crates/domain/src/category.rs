//! Map data categories and what a caller asked for

use std::fmt;

use serde::{Deserialize, Serialize};

/// One named slice of the map-data payload.
///
/// Raids and quests are not categories of their own: they are views over the
/// gym and pokestop records and arrive under those keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Gyms,
    Pokestops,
    Pokemon,
    Spawnpoints,
    PokemonFilters,
    Devices,
    Instances,
    Assignments,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Gyms,
        Category::Pokestops,
        Category::Pokemon,
        Category::Spawnpoints,
        Category::PokemonFilters,
        Category::Devices,
        Category::Instances,
        Category::Assignments,
    ];

    /// Payload key for this category.
    pub fn key(self) -> &'static str {
        match self {
            Category::Gyms => "gyms",
            Category::Pokestops => "pokestops",
            Category::Pokemon => "pokemon",
            Category::Spawnpoints => "spawnpoints",
            Category::PokemonFilters => "pokemon_filters",
            Category::Devices => "devices",
            Category::Instances => "instances",
            Category::Assignments => "assignments",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single `show_*` toggle on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestFlag {
    Gyms,
    Raids,
    Pokestops,
    Quests,
    Pokemon,
    Spawnpoints,
    PokemonFilter,
    Devices,
    Instances,
    Assignments,
}

impl RequestFlag {
    /// Flags that make the viewport mandatory.
    pub const SPATIAL: [RequestFlag; 6] = [
        RequestFlag::Gyms,
        RequestFlag::Raids,
        RequestFlag::Pokestops,
        RequestFlag::Quests,
        RequestFlag::Pokemon,
        RequestFlag::Spawnpoints,
    ];
}

/// Which categories the caller asked for, plus presentation toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRequest {
    pub show_gyms: bool,
    pub show_raids: bool,
    pub show_pokestops: bool,
    pub show_quests: bool,
    pub show_pokemon: bool,
    pub show_spawnpoints: bool,
    pub show_pokemon_filter: bool,
    pub show_devices: bool,
    pub show_instances: bool,
    pub show_assignments: bool,
    /// Species the caller has hidden on their map.
    pub pokemon_filter_exclude: Vec<u16>,
    /// Attach human-readable values and UI fragments to admin rows.
    pub formatted: bool,
}

impl CategoryRequest {
    pub fn is_set(&self, flag: RequestFlag) -> bool {
        match flag {
            RequestFlag::Gyms => self.show_gyms,
            RequestFlag::Raids => self.show_raids,
            RequestFlag::Pokestops => self.show_pokestops,
            RequestFlag::Quests => self.show_quests,
            RequestFlag::Pokemon => self.show_pokemon,
            RequestFlag::Spawnpoints => self.show_spawnpoints,
            RequestFlag::PokemonFilter => self.show_pokemon_filter,
            RequestFlag::Devices => self.show_devices,
            RequestFlag::Instances => self.show_instances,
            RequestFlag::Assignments => self.show_assignments,
        }
    }

    /// Whether any viewport-scoped category was requested, permitted or not.
    pub fn requests_spatial(&self) -> bool {
        RequestFlag::SPATIAL.iter().any(|flag| self.is_set(*flag))
    }
}
