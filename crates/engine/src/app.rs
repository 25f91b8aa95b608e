//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{
    ClockPort, FragmentRenderer, LocalizerPort, SessionRepo, StoragePort,
};
use crate::use_cases::map_data::{GetMapData, MapDataSettings};
use crate::use_cases::MapDataUseCases;

/// Main application state.
///
/// Holds the session store and use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub sessions: Arc<dyn SessionRepo>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub map_data: MapDataUseCases,
}

impl App {
    pub fn new(
        storage: Arc<dyn StoragePort>,
        sessions: Arc<dyn SessionRepo>,
        localizer: Arc<dyn LocalizerPort>,
        renderer: Arc<dyn FragmentRenderer>,
        clock: Arc<dyn ClockPort>,
        settings: MapDataSettings,
    ) -> Self {
        let get_data = Arc::new(GetMapData::new(
            storage, localizer, renderer, clock, settings,
        ));

        Self {
            sessions,
            use_cases: UseCases {
                map_data: MapDataUseCases::new(get_data),
            },
        }
    }
}
