//! RealDeviceMap Protocol - Wire contracts for the map data API
//!
//! This crate contains the types shared between the engine and map clients:
//! - `requests` - lenient parsing of `get_data` query parameters
//! - `responses` - the strongly typed, versioned response payload
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, and tracing
//! 2. **No business logic** - Parsing and serialization only; gating and
//!    aggregation live in the engine
//! 3. **Absent means not shown** - category fields are optional and omitted
//!    from the JSON when unset, never serialized as `null`

pub mod requests;
pub mod responses;

pub use requests::MapDataParams;
pub use responses::{
    AssignmentRow, DeviceRow, InstanceRow, MapDataResponse, PokemonFilterRow, TimeField,
};
