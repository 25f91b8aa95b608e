//! Viewport bounding box

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A rectangular viewport in degrees.
///
/// All four bounds are finite. Inverted ranges are accepted as-is; they
/// simply match nothing in storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl MapBounds {
    /// Create bounds from four coordinates.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if any bound is NaN or infinite.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self, DomainError> {
        if ![min_lat, max_lat, min_lon, max_lon]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(DomainError::validation("map bounds must be finite"));
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    /// Build bounds from optional request parts.
    ///
    /// Returns `None` when any part is absent or invalid; a partial box is
    /// never completed with defaults.
    pub fn from_parts(
        min_lat: Option<f64>,
        max_lat: Option<f64>,
        min_lon: Option<f64>,
        max_lon: Option<f64>,
    ) -> Option<Self> {
        Self::new(min_lat?, max_lat?, min_lon?, max_lon?).ok()
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }
}
