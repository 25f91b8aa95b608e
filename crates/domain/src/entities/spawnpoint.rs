use serde::{Deserialize, Serialize};

/// A static spawn location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnpointRecord {
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
    /// Second of the hour at which spawns here despawn, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub despawn_second: Option<u16>,
    pub updated: u32,
}
