//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Entity storage (SQLite today, anything that can answer a viewport query)
//! - The session store
//! - Localization and fragment rendering
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{
    EntityStores, FleetRepo, GymRepo, PokemonRepo, PokestopRepo, SessionRepo, SpawnpointRepo,
    StoragePort,
};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{FragmentParams, FragmentRenderer, FragmentTemplate, LocalizerPort};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{
    MockFleetRepo, MockGymRepo, MockPokemonRepo, MockPokestopRepo, MockSessionRepo,
    MockSpawnpointRepo, MockStoragePort,
};

#[cfg(test)]
pub use external::MockLocalizerPort;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
