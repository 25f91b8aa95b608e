//! RealDeviceMap domain.
//!
//! Pure types with no I/O:
//! - `capability` - decoding a session permission mask into named grants
//! - `category` - payload categories and the caller's `show_*` request
//! - `gate` - the per-category allow/deny and query-variant rules
//! - `entities` - records returned by the map and fleet stores
//! - `value_objects` - viewport bounds and the update watermark

pub mod capability;
pub mod category;
pub mod entities;
pub mod error;
pub mod gate;
pub mod value_objects;

pub use capability::{Capability, CapabilitySet};
pub use category::{Category, CategoryRequest, RequestFlag};
pub use entities::{
    AssignmentRecord, DeviceRecord, GymRecord, InstanceRecord, InstanceType, PokemonRecord,
    PokestopRecord, QuestInfo, RaidInfo, SpawnpointRecord,
};
pub use error::DomainError;
pub use gate::{GateDecision, GateRule, GymQuery, PokestopQuery, QueryVariant, GATE_TABLE};
pub use value_objects::{MapBounds, UpdateWatermark};
