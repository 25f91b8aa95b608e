//! Entity records returned by the map and fleet stores

mod assignment;
mod device;
mod gym;
mod instance;
mod pokemon;
mod pokestop;
mod spawnpoint;

pub use assignment::AssignmentRecord;
pub use device::DeviceRecord;
pub use gym::{GymRecord, RaidInfo};
pub use instance::{InstanceRecord, InstanceType};
pub use pokemon::PokemonRecord;
pub use pokestop::{PokestopRecord, QuestInfo};
pub use spawnpoint::SpawnpointRecord;
