//! Gym records and their raid view

use serde::{Deserialize, Serialize};

/// A raid currently scheduled or running at a gym.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaidInfo {
    pub level: u8,
    /// Unknown until the egg hatches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pokemon_id: Option<u16>,
    pub spawn_timestamp: u32,
    pub battle_timestamp: u32,
    pub end_timestamp: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GymRecord {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_slots: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guarding_pokemon_id: Option<u16>,
    #[serde(default)]
    pub ex_raid_eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raid: Option<RaidInfo>,
    pub updated: u32,
}

impl GymRecord {
    /// Drop raid sub-fields for callers without the raid grant.
    pub fn without_raid(mut self) -> Self {
        self.raid = None;
        self
    }
}
