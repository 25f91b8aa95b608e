//! Pokestop records and their quest view

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestInfo {
    pub quest_type: u16,
    pub target: u16,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_type: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_item_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_pokemon_id: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokestopRecord {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lure_expire_timestamp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest: Option<QuestInfo>,
    pub updated: u32,
}

impl PokestopRecord {
    /// Drop quest sub-fields for callers without the quest grant.
    pub fn without_quest(mut self) -> Self {
        self.quest = None;
        self
    }
}
