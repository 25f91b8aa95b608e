//! Repository port traits for the entity stores and the session store.

use std::sync::Arc;

use async_trait::async_trait;
use rdm_domain::{
    AssignmentRecord, DeviceRecord, GymQuery, GymRecord, InstanceRecord, MapBounds,
    PokemonRecord, PokestopQuery, PokestopRecord, SpawnpointRecord, UpdateWatermark,
};

use super::error::RepoError;

// =============================================================================
// Storage Handle
// =============================================================================

/// Obtains the entity stores for one aggregation.
///
/// `connect` is the single point where "the storage backend is down" is
/// detected. The returned handle is owned by the request and released when
/// it is dropped, whatever the outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoragePort: Send + Sync {
    async fn connect(&self) -> Result<EntityStores, RepoError>;
}

/// The five independent entity stores, as seen by one request.
#[derive(Clone)]
pub struct EntityStores {
    pub gyms: Arc<dyn GymRepo>,
    pub pokestops: Arc<dyn PokestopRepo>,
    pub pokemon: Arc<dyn PokemonRepo>,
    pub spawnpoints: Arc<dyn SpawnpointRepo>,
    pub fleet: Arc<dyn FleetRepo>,
}

// =============================================================================
// Map Entity Ports (viewport + watermark)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GymRepo: Send + Sync {
    /// Gyms inside `bounds` updated at or after `since`.
    async fn list_in_bounds(
        &self,
        bounds: MapBounds,
        since: UpdateWatermark,
        query: GymQuery,
    ) -> Result<Vec<GymRecord>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PokestopRepo: Send + Sync {
    /// Pokestops inside `bounds` updated at or after `since`.
    async fn list_in_bounds(
        &self,
        bounds: MapBounds,
        since: UpdateWatermark,
        query: PokestopQuery,
    ) -> Result<Vec<PokestopRecord>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PokemonRepo: Send + Sync {
    /// Live spawns inside `bounds` updated at or after `since`, minus the
    /// excluded species.
    async fn list_in_bounds(
        &self,
        bounds: MapBounds,
        since: UpdateWatermark,
        exclude: &[u16],
    ) -> Result<Vec<PokemonRecord>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpawnpointRepo: Send + Sync {
    async fn list_in_bounds(
        &self,
        bounds: MapBounds,
        since: UpdateWatermark,
    ) -> Result<Vec<SpawnpointRecord>, RepoError>;
}

// =============================================================================
// Fleet Port (not spatial)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FleetRepo: Send + Sync {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, RepoError>;
    async fn list_instances(&self) -> Result<Vec<InstanceRecord>, RepoError>;
    async fn list_assignments(&self) -> Result<Vec<AssignmentRecord>, RepoError>;
}

// =============================================================================
// Session Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepo: Send + Sync {
    /// Permission mask stored for a session token, `None` if no such session.
    async fn get_permissions(&self, token: &str) -> Result<Option<u32>, RepoError>;
}
