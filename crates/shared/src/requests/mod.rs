//! Request parameter types

mod map_data;

pub use map_data::MapDataParams;
