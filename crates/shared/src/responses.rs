//! Response payload for `get_data`
//!
//! One optional field per category. A category that was denied, not
//! requested, or whose query failed is `None` and does not appear in the
//! JSON at all; `Some(vec![])` means "shown, but nothing there".

use serde::{Deserialize, Serialize};

use rdm_domain::{Category, GymRecord, PokemonRecord, PokestopRecord, SpawnpointRecord};

// =============================================================================
// Payload
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDataResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gyms: Option<Vec<GymRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pokestops: Option<Vec<PokestopRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pokemon: Option<Vec<PokemonRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawnpoints: Option<Vec<SpawnpointRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pokemon_filters: Option<Vec<PokemonFilterRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<DeviceRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<Vec<InstanceRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignments: Option<Vec<AssignmentRow>>,
    /// Server time (epoch seconds) at aggregation. Clients send it back as
    /// `last_update` on the next poll.
    pub timestamp: i64,
}

impl MapDataResponse {
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            ..Default::default()
        }
    }

    /// Whether the payload carries a key for this category.
    pub fn contains(&self, category: Category) -> bool {
        match category {
            Category::Gyms => self.gyms.is_some(),
            Category::Pokestops => self.pokestops.is_some(),
            Category::Pokemon => self.pokemon.is_some(),
            Category::Spawnpoints => self.spawnpoints.is_some(),
            Category::PokemonFilters => self.pokemon_filters.is_some(),
            Category::Devices => self.devices.is_some(),
            Category::Instances => self.instances.is_some(),
            Category::Assignments => self.assignments.is_some(),
        }
    }

    /// Categories present in the payload, in `Category::ALL` order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }
}

// =============================================================================
// Admin rows
// =============================================================================

/// A time value, raw or with its human-readable rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeField {
    Formatted { timestamp: u32, formatted: String },
    Raw(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRow {
    pub uuid: String,
    pub host: String,
    pub instance: String,
    pub username: String,
    pub last_seen: TimeField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRow {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub instance_name: String,
    pub device_uuid: String,
    pub time: TimeField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<String>,
}

/// Presentation metadata for one species in the map filter dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonFilterRow {
    /// Zero-padded to three digits.
    pub pokemon_id: String,
    pub pokemon_name: String,
    pub image: String,
    pub filter: String,
    pub size: String,
}
