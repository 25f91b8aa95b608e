//! RealDeviceMap Engine library.
//!
//! Server side of the map: answers the `get_data` poll with whatever the
//! caller's session is allowed to see.
//!
//! ## Structure
//!
//! - `use_cases/` - The map data aggregation
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
