//! Value objects - Immutable objects defined by their attributes

mod map_bounds;
mod watermark;

pub use map_bounds::MapBounds;
pub use watermark::UpdateWatermark;
