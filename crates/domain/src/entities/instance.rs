//! Scanning jobs ("instances")

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Closed set of job kinds a device can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceType {
    CircleRaid,
    CirclePokemon,
    AutoQuest,
    PokemonIv,
}

impl InstanceType {
    /// Label shown in the dashboard.
    pub fn display_name(self) -> &'static str {
        match self {
            InstanceType::CircleRaid => "Circle Raid",
            InstanceType::CirclePokemon => "Circle Pokemon",
            InstanceType::AutoQuest => "Auto Quest",
            InstanceType::PokemonIv => "Pokemon IV",
        }
    }

    /// Tag as stored by the fleet store.
    pub fn as_tag(self) -> &'static str {
        match self {
            InstanceType::CircleRaid => "circle_raid",
            InstanceType::CirclePokemon => "circle_pokemon",
            InstanceType::AutoQuest => "auto_quest",
            InstanceType::PokemonIv => "pokemon_iv",
        }
    }
}

impl std::fmt::Display for InstanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for InstanceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "circle_raid" => Ok(InstanceType::CircleRaid),
            "circle_pokemon" => Ok(InstanceType::CirclePokemon),
            "auto_quest" => Ok(InstanceType::AutoQuest),
            "pokemon_iv" => Ok(InstanceType::PokemonIv),
            _ => Err(DomainError::parse(format!("Unknown instance type: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub name: String,
    pub instance_type: InstanceType,
    /// Live status line reported by the instance controller.
    pub status: Option<String>,
}
