//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.

pub mod map_data;

pub use map_data::MapDataUseCases;
