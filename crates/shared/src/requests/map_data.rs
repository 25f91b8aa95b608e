//! `get_data` query parameters
//!
//! Parsing is lenient: a value that does not parse is treated as absent (or
//! `false` for toggles). Whether absence is an error is decided later by the
//! engine, which knows which categories need a viewport.

use std::collections::HashMap;

use rdm_domain::{CategoryRequest, MapBounds, UpdateWatermark};

/// Parsed `get_data` request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapDataParams {
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lon: Option<f64>,
    pub max_lon: Option<f64>,
    pub categories: CategoryRequest,
    pub last_update: UpdateWatermark,
}

impl MapDataParams {
    /// Parse from decoded query-string pairs.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let flag = |name: &str| params.get(name).is_some_and(|v| parse_bool(v));
        let coord = |name: &str| params.get(name).and_then(|v| parse_coordinate(v));

        let categories = CategoryRequest {
            show_gyms: flag("show_gyms"),
            show_raids: flag("show_raids"),
            show_pokestops: flag("show_pokestops"),
            show_quests: flag("show_quests"),
            show_pokemon: flag("show_pokemon"),
            show_spawnpoints: flag("show_spawnpoints"),
            show_pokemon_filter: flag("show_pokemon_filter"),
            show_devices: flag("show_devices"),
            show_instances: flag("show_instances"),
            show_assignments: flag("show_assignments"),
            pokemon_filter_exclude: params
                .get("pokemon_filter_exclude")
                .map(|v| parse_exclude_list(v))
                .unwrap_or_default(),
            formatted: flag("formatted"),
        };

        let last_update = params
            .get("last_update")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .map(UpdateWatermark::new)
            .unwrap_or_default();

        Self {
            min_lat: coord("min_lat"),
            max_lat: coord("max_lat"),
            min_lon: coord("min_lon"),
            max_lon: coord("max_lon"),
            categories,
            last_update,
        }
    }

    /// The viewport, if all four bounds were supplied.
    pub fn bounds(&self) -> Option<MapBounds> {
        MapBounds::from_parts(self.min_lat, self.max_lat, self.min_lon, self.max_lon)
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `pokemon_filter_exclude` is a JSON array of species ids. Ids outside the
/// species range are dropped individually.
fn parse_exclude_list(value: &str) -> Vec<u16> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<i64>>(value) {
        Ok(ids) => ids
            .into_iter()
            .filter_map(|id| u16::try_from(id).ok())
            .collect(),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring undecodable pokemon_filter_exclude");
            Vec::new()
        }
    }
}
