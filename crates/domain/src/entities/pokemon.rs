use serde::{Deserialize, Serialize};

/// A live creature spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonRecord {
    /// Encounter id, unique per spawn.
    pub id: String,
    pub pokemon_id: u16,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn_id: Option<u64>,
    pub expire_timestamp: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atk_iv: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub def_iv: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sta_iv: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    pub updated: u32,
}
