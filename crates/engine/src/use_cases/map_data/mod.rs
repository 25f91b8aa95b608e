//! Map data use cases.

mod get_data;
pub mod presentation;

pub use get_data::{
    GetMapData, MapDataError, MapDataOutcome, MapDataRequest, MapDataSettings, SkipReason,
    SkippedCategory,
};

use std::sync::Arc;

/// Container for map data use cases.
pub struct MapDataUseCases {
    pub get_data: Arc<GetMapData>,
}

impl MapDataUseCases {
    pub fn new(get_data: Arc<GetMapData>) -> Self {
        Self { get_data }
    }
}
