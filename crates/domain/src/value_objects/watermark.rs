//! Incremental-poll watermark

use serde::{Deserialize, Serialize};

/// "Only records updated at or after this instant" (epoch seconds).
///
/// Zero means "everything" and is what a first poll sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateWatermark(u32);

impl UpdateWatermark {
    pub const ALL: UpdateWatermark = UpdateWatermark(0);

    pub fn new(epoch_seconds: u32) -> Self {
        Self(epoch_seconds)
    }

    pub fn epoch_seconds(&self) -> u32 {
        self.0
    }

    pub fn is_all(&self) -> bool {
        self.0 == 0
    }}

impl From<u32> for UpdateWatermark {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
