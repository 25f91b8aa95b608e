//! Get map data use case.
//!
//! One stateless aggregation per poll: gate every category against the
//! caller's capabilities, fan the permitted queries out concurrently, and
//! merge whatever succeeded into a single payload.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rdm_domain::{
    gate, CapabilitySet, Category, CategoryRequest, GateDecision, GymQuery, MapBounds,
    PokestopQuery, QueryVariant, UpdateWatermark,
};
use rdm_shared::{MapDataParams, MapDataResponse};

use super::presentation::RowBuilder;
use crate::infrastructure::ports::{
    ClockPort, EntityStores, FragmentRenderer, LocalizerPort, RepoError, StoragePort,
};

// =============================================================================
// DTOs (Use Case Request/Result Types)
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapDataRequest {
    pub categories: CategoryRequest,
    /// `None` when any of the four bounds was missing.
    pub bounds: Option<MapBounds>,
    pub since: UpdateWatermark,
}

impl From<MapDataParams> for MapDataRequest {
    fn from(params: MapDataParams) -> Self {
        Self {
            bounds: params.bounds(),
            since: params.last_update,
            categories: params.categories,
        }
    }
}

/// Why a permitted category is missing from the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Failed(String),
    TimedOut,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Failed(message) => write!(f, "query failed: {message}"),
            SkipReason::TimedOut => f.write_str("query timed out"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCategory {
    pub category: Category,
    pub reason: SkipReason,
}

/// Payload plus the permitted categories that could not be produced.
///
/// `skipped` never reaches the wire; a missing key there just means "no
/// data this round".
#[derive(Debug, Clone)]
pub struct MapDataOutcome {
    pub response: MapDataResponse,
    pub skipped: Vec<SkippedCategory>,
}

#[derive(Debug, thiserror::Error)]
pub enum MapDataError {
    #[error("No valid session")]
    Unauthorized,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] RepoError),
}

/// Tunables for one aggregation.
#[derive(Debug, Clone, Copy)]
pub struct MapDataSettings {
    pub max_pokemon_id: u16,
    pub category_timeout: Duration,
}

// =============================================================================
// Use Case
// =============================================================================

pub struct GetMapData {
    storage: Arc<dyn StoragePort>,
    localizer: Arc<dyn LocalizerPort>,
    renderer: Arc<dyn FragmentRenderer>,
    clock: Arc<dyn ClockPort>,
    settings: MapDataSettings,
}

type CategoryResult<T> = Option<Result<T, SkipReason>>;

impl GetMapData {
    pub fn new(
        storage: Arc<dyn StoragePort>,
        localizer: Arc<dyn LocalizerPort>,
        renderer: Arc<dyn FragmentRenderer>,
        clock: Arc<dyn ClockPort>,
        settings: MapDataSettings,
    ) -> Self {
        Self {
            storage,
            localizer,
            renderer,
            clock,
            settings,
        }
    }

    /// Execute one aggregation.
    ///
    /// # Returns
    /// * `Ok(MapDataOutcome)` - payload, possibly with some categories skipped
    /// * `Err(MapDataError)` - the request as a whole cannot be answered
    pub async fn execute(
        &self,
        request: MapDataRequest,
        caps: &CapabilitySet,
    ) -> Result<MapDataOutcome, MapDataError> {
        if caps.is_empty() {
            return Err(MapDataError::Unauthorized);
        }

        if request.categories.requests_spatial() && request.bounds.is_none() {
            return Err(MapDataError::BadRequest(
                "min_lat, max_lat, min_lon and max_lon are required for map categories"
                    .to_string(),
            ));
        }

        let stores = self.storage.connect().await.map_err(|e| {
            tracing::error!(error = %e, "Storage unavailable for map data request");
            MapDataError::StorageUnavailable(e)
        })?;

        let decisions = gate::evaluate(&request.categories, caps);
        let allowed = |category: Category| match decisions
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, d)| *d)
        {
            Some(GateDecision::Allowed(variant)) => Some(variant),
            _ => None,
        };

        let outcome = self.dispatch(&stores, &request, &allowed).await;
        drop(stores);

        tracing::debug!(
            categories = ?outcome.response.categories(),
            skipped = outcome.skipped.len(),
            "Map data aggregated"
        );
        Ok(outcome)
    }

    async fn dispatch(
        &self,
        stores: &EntityStores,
        request: &MapDataRequest,
        allowed: &(dyn Fn(Category) -> Option<QueryVariant> + Sync),
    ) -> MapDataOutcome {
        let since = request.since;
        let bounds = request.bounds;
        let spatial = |category: Category| bounds.and_then(|b| allowed(category).map(|v| (b, v)));

        let gyms = spatial(Category::Gyms).map(|(b, variant)| {
            let query = match variant {
                QueryVariant::Gyms(query) => query,
                _ => GymQuery::default(),
            };
            self.run(Category::Gyms, stores.gyms.list_in_bounds(b, since, query))
        });
        let pokestops = spatial(Category::Pokestops).map(|(b, variant)| {
            let query = match variant {
                QueryVariant::Pokestops(query) => query,
                _ => PokestopQuery::default(),
            };
            self.run(
                Category::Pokestops,
                stores.pokestops.list_in_bounds(b, since, query),
            )
        });
        let exclude = request.categories.pokemon_filter_exclude.as_slice();
        let pokemon = spatial(Category::Pokemon).map(|(b, _)| {
            self.run(
                Category::Pokemon,
                stores.pokemon.list_in_bounds(b, since, exclude),
            )
        });
        let spawnpoints = spatial(Category::Spawnpoints).map(|(b, _)| {
            self.run(
                Category::Spawnpoints,
                stores.spawnpoints.list_in_bounds(b, since),
            )
        });
        let devices = allowed(Category::Devices)
            .map(|_| self.run(Category::Devices, stores.fleet.list_devices()));
        let instances = allowed(Category::Instances)
            .map(|_| self.run(Category::Instances, stores.fleet.list_instances()));
        let assignments = allowed(Category::Assignments)
            .map(|_| self.run(Category::Assignments, stores.fleet.list_assignments()));

        let (gyms, pokestops, pokemon, spawnpoints, devices, instances, assignments) = tokio::join!(
            maybe(gyms),
            maybe(pokestops),
            maybe(pokemon),
            maybe(spawnpoints),
            maybe(devices),
            maybe(instances),
            maybe(assignments),
        );

        let rows = RowBuilder {
            formatted: request.categories.formatted,
            localizer: self.localizer.as_ref(),
            renderer: self.renderer.as_ref(),
        };

        let mut skipped = Vec::new();
        let mut response = MapDataResponse::new(self.clock.now().timestamp());

        response.gyms = keep(Category::Gyms, gyms, &mut skipped);
        response.pokestops = keep(Category::Pokestops, pokestops, &mut skipped);
        response.pokemon = keep(Category::Pokemon, pokemon, &mut skipped);
        response.spawnpoints = keep(Category::Spawnpoints, spawnpoints, &mut skipped);
        response.devices = keep(Category::Devices, devices, &mut skipped)
            .map(|list| list.into_iter().map(|d| rows.device(d)).collect());
        response.instances = keep(Category::Instances, instances, &mut skipped)
            .map(|list| list.into_iter().map(|i| rows.instance(i)).collect());
        response.assignments = keep(Category::Assignments, assignments, &mut skipped)
            .map(|list| list.into_iter().map(|a| rows.assignment(a)).collect());
        response.pokemon_filters = allowed(Category::PokemonFilters)
            .map(|_| rows.pokemon_filters(self.settings.max_pokemon_id));

        MapDataOutcome { response, skipped }
    }

    /// One category query under the per-category deadline.
    async fn run<T>(
        &self,
        category: Category,
        query: impl Future<Output = Result<T, RepoError>>,
    ) -> Result<T, SkipReason> {
        match tokio::time::timeout(self.settings.category_timeout, query).await {
            Ok(Ok(records)) => Ok(records),
            Ok(Err(e)) => {
                tracing::warn!(category = %category, error = %e, "Category query failed, omitting");
                Err(SkipReason::Failed(e.to_string()))
            }
            Err(_) => {
                tracing::warn!(
                    category = %category,
                    timeout_ms = self.settings.category_timeout.as_millis() as u64,
                    "Category query timed out, omitting"
                );
                Err(SkipReason::TimedOut)
            }
        }
    }
}

async fn maybe<F: Future>(query: Option<F>) -> Option<F::Output> {
    match query {
        Some(query) => Some(query.await),
        None => None,
    }
}

fn keep<T>(
    category: Category,
    result: CategoryResult<T>,
    skipped: &mut Vec<SkippedCategory>,
) -> Option<T> {
    match result? {
        Ok(records) => Some(records),
        Err(reason) => {
            skipped.push(SkippedCategory { category, reason });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::fragments::HtmlFragmentRenderer;
    use crate::infrastructure::localizer::JsonLocalizer;
    use crate::infrastructure::ports::{
        MockClockPort, MockFleetRepo, MockGymRepo, MockPokemonRepo, MockPokestopRepo,
        MockSpawnpointRepo, MockStoragePort,
    };
    use chrono::FixedOffset;
    use mockall::predicate::*;
    use rdm_domain::{
        AssignmentRecord, Capability, DeviceRecord, GymRecord, PokemonRecord, RaidInfo,
    };
    use rdm_shared::TimeField;

    const NOW: i64 = 1_700_000_000;

    /// Mocks for every store; tests set the expectations they need.
    /// Any call without an expectation panics inside the mock.
    struct Stores {
        gyms: MockGymRepo,
        pokestops: MockPokestopRepo,
        pokemon: MockPokemonRepo,
        spawnpoints: MockSpawnpointRepo,
        fleet: MockFleetRepo,
    }

    impl Stores {
        fn new() -> Self {
            Self {
                gyms: MockGymRepo::new(),
                pokestops: MockPokestopRepo::new(),
                pokemon: MockPokemonRepo::new(),
                spawnpoints: MockSpawnpointRepo::new(),
                fleet: MockFleetRepo::new(),
            }
        }

        fn into_storage(self) -> MockStoragePort {
            let stores = EntityStores {
                gyms: Arc::new(self.gyms),
                pokestops: Arc::new(self.pokestops),
                pokemon: Arc::new(self.pokemon),
                spawnpoints: Arc::new(self.spawnpoints),
                fleet: Arc::new(self.fleet),
            };
            let mut storage = MockStoragePort::new();
            storage
                .expect_connect()
                .returning(move || Ok(stores.clone()));
            storage
        }
    }

    fn use_case(storage: MockStoragePort) -> GetMapData {
        use_case_with_timeout(storage, Duration::from_secs(5))
    }

    fn use_case_with_timeout(storage: MockStoragePort, category_timeout: Duration) -> GetMapData {
        let utc = FixedOffset::east_opt(0).expect("utc");
        GetMapData::new(
            Arc::new(storage),
            Arc::new(JsonLocalizer::builtin(utc)),
            Arc::new(HtmlFragmentRenderer::new()),
            Arc::new(FixedClock::at(NOW)),
            MapDataSettings {
                max_pokemon_id: 10,
                category_timeout,
            },
        )
    }

    fn caps(list: &[Capability]) -> CapabilitySet {
        list.iter().copied().collect()
    }

    fn viewport() -> MapBounds {
        MapBounds::new(10.0, 20.0, 10.0, 20.0).expect("bounds")
    }

    fn map_request(categories: CategoryRequest) -> MapDataRequest {
        MapDataRequest {
            categories,
            bounds: Some(viewport()),
            since: UpdateWatermark::ALL,
        }
    }

    fn admin_request(formatted: bool) -> MapDataRequest {
        MapDataRequest {
            categories: CategoryRequest {
                show_devices: true,
                show_instances: true,
                show_assignments: true,
                formatted,
                ..Default::default()
            },
            bounds: None,
            since: UpdateWatermark::ALL,
        }
    }

    fn gym(id: &str) -> GymRecord {
        GymRecord {
            id: id.to_string(),
            lat: 15.0,
            lon: 15.0,
            name: Some("Fountain".to_string()),
            url: None,
            team_id: Some(1),
            available_slots: Some(2),
            guarding_pokemon_id: None,
            ex_raid_eligible: false,
            raid: Some(RaidInfo {
                level: 5,
                pokemon_id: Some(150),
                spawn_timestamp: 1,
                battle_timestamp: 2,
                end_timestamp: u32::MAX,
            }),
            updated: 100,
        }
    }

    fn pokemon(id: &str, species: u16) -> PokemonRecord {
        PokemonRecord {
            id: id.to_string(),
            pokemon_id: species,
            lat: 15.0,
            lon: 15.0,
            form: None,
            spawn_id: None,
            expire_timestamp: u32::MAX,
            atk_iv: None,
            def_iv: None,
            sta_iv: None,
            cp: None,
            level: None,
            updated: 100,
        }
    }

    // -------------------------------------------------------------------------
    // Request-level faults
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn empty_capabilities_are_unauthorized_before_storage() {
        let mut storage = MockStoragePort::new();
        storage.expect_connect().never();

        let request = map_request(CategoryRequest {
            show_pokemon: true,
            ..Default::default()
        });
        let result = use_case(storage).execute(request, &CapabilitySet::empty()).await;

        assert!(matches!(result, Err(MapDataError::Unauthorized)));
    }

    #[tokio::test]
    async fn spatial_request_without_bounds_is_bad_request() {
        for categories in [
            CategoryRequest { show_gyms: true, ..Default::default() },
            CategoryRequest { show_raids: true, ..Default::default() },
            CategoryRequest { show_pokestops: true, ..Default::default() },
            CategoryRequest { show_quests: true, ..Default::default() },
            CategoryRequest { show_pokemon: true, ..Default::default() },
        ] {
            let mut storage = MockStoragePort::new();
            storage.expect_connect().never();

            let request = MapDataRequest {
                categories,
                bounds: None,
                since: UpdateWatermark::ALL,
            };
            let result = use_case(storage)
                .execute(request, &caps(&Capability::ALL))
                .await;

            assert!(matches!(result, Err(MapDataError::BadRequest(_))));
        }
    }

    #[tokio::test]
    async fn unauthorized_wins_over_bad_request() {
        let mut storage = MockStoragePort::new();
        storage.expect_connect().never();

        let request = MapDataRequest {
            categories: CategoryRequest {
                show_gyms: true,
                ..Default::default()
            },
            bounds: None,
            since: UpdateWatermark::ALL,
        };
        let result = use_case(storage).execute(request, &CapabilitySet::empty()).await;

        assert!(matches!(result, Err(MapDataError::Unauthorized)));
    }

    #[tokio::test]
    async fn unreachable_storage_is_reported_not_emptied() {
        let mut storage = MockStoragePort::new();
        storage
            .expect_connect()
            .times(1)
            .returning(|| Err(RepoError::unavailable("connection refused")));

        let request = map_request(CategoryRequest {
            show_pokemon: true,
            ..Default::default()
        });
        let result = use_case(storage)
            .execute(request, &caps(&[Capability::ViewMap, Capability::ViewMapPokemon]))
            .await;

        assert!(matches!(result, Err(MapDataError::StorageUnavailable(_))));
    }

    // -------------------------------------------------------------------------
    // Gating
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn empty_store_yields_empty_pokemon_array() {
        let mut stores = Stores::new();
        stores
            .pokemon
            .expect_list_in_bounds()
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let request = map_request(CategoryRequest {
            show_pokemon: true,
            ..Default::default()
        });
        let outcome = use_case(stores.into_storage())
            .execute(request, &caps(&[Capability::ViewMap, Capability::ViewMapPokemon]))
            .await
            .expect("outcome");

        let json = serde_json::to_value(&outcome.response).expect("serialize");
        assert_eq!(json, serde_json::json!({ "pokemon": [], "timestamp": NOW }));
        assert!(outcome.skipped.is_empty());
    }

    #[tokio::test]
    async fn map_only_grant_never_reaches_fleet_views() {
        // No fleet expectations: any fleet call would panic.
        let stores = Stores::new();

        let outcome = use_case(stores.into_storage())
            .execute(
                admin_request(true),
                &caps(&[
                    Capability::ViewMap,
                    Capability::ViewMapGym,
                    Capability::ViewMapPokemon,
                    Capability::ViewStats,
                ]),
            )
            .await
            .expect("outcome");

        assert!(!outcome.response.contains(Category::Devices));
        assert!(!outcome.response.contains(Category::Instances));
        assert!(!outcome.response.contains(Category::Assignments));
    }

    #[tokio::test]
    async fn raids_without_gym_grant_get_raid_subset() {
        let mut stores = Stores::new();
        stores
            .gyms
            .expect_list_in_bounds()
            .with(
                always(),
                always(),
                eq(GymQuery {
                    raids_only: true,
                    show_raids: true,
                }),
            )
            .times(1)
            .returning(|_, _, _| Ok(vec![gym("g1")]));

        let request = map_request(CategoryRequest {
            show_gyms: true,
            show_raids: true,
            ..Default::default()
        });
        let outcome = use_case(stores.into_storage())
            .execute(request, &caps(&[Capability::ViewMap, Capability::ViewMapRaid]))
            .await
            .expect("outcome");

        let gyms = outcome.response.gyms.expect("gyms key");
        assert_eq!(gyms.len(), 1);
        assert!(gyms[0].raid.is_some());
    }

    #[tokio::test]
    async fn gyms_without_any_grant_are_absent() {
        let stores = Stores::new();

        let request = map_request(CategoryRequest {
            show_gyms: true,
            show_raids: true,
            ..Default::default()
        });
        let outcome = use_case(stores.into_storage())
            .execute(request, &caps(&[Capability::ViewMap]))
            .await
            .expect("outcome");

        assert!(outcome.response.gyms.is_none());
    }

    #[tokio::test]
    async fn full_gym_grant_runs_full_query() {
        let mut stores = Stores::new();
        stores
            .gyms
            .expect_list_in_bounds()
            .with(
                eq(viewport()),
                eq(UpdateWatermark::new(1_600_000_000)),
                eq(GymQuery {
                    raids_only: false,
                    show_raids: false,
                }),
            )
            .times(1)
            .returning(|_, _, _| Ok(vec![gym("g1").without_raid()]));

        let request = MapDataRequest {
            since: UpdateWatermark::new(1_600_000_000),
            ..map_request(CategoryRequest {
                show_gyms: true,
                ..Default::default()
            })
        };
        let outcome = use_case(stores.into_storage())
            .execute(request, &caps(&[Capability::ViewMap, Capability::ViewMapGym]))
            .await
            .expect("outcome");

        assert_eq!(outcome.response.gyms.map(|g| g.len()), Some(1));
    }

    #[tokio::test]
    async fn quests_without_pokestop_grant_get_quest_subset() {
        let mut stores = Stores::new();
        stores
            .pokestops
            .expect_list_in_bounds()
            .with(
                always(),
                always(),
                eq(PokestopQuery {
                    quests_only: true,
                    show_quests: true,
                }),
            )
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let request = map_request(CategoryRequest {
            show_quests: true,
            ..Default::default()
        });
        let outcome = use_case(stores.into_storage())
            .execute(request, &caps(&[Capability::ViewMap, Capability::ViewMapQuest]))
            .await
            .expect("outcome");

        assert_eq!(outcome.response.pokestops, Some(vec![]));
    }

    #[tokio::test]
    async fn exclusion_list_is_forwarded_to_pokemon_store() {
        let mut stores = Stores::new();
        stores
            .pokemon
            .expect_list_in_bounds()
            .withf(|_, _, exclude| exclude.to_vec() == vec![16, 19])
            .times(1)
            .returning(|_, _, _| Ok(vec![pokemon("p1", 1)]));

        let request = map_request(CategoryRequest {
            show_pokemon: true,
            pokemon_filter_exclude: vec![16, 19],
            ..Default::default()
        });
        let outcome = use_case(stores.into_storage())
            .execute(request, &caps(&[Capability::ViewMap, Capability::ViewMapPokemon]))
            .await
            .expect("outcome");

        assert_eq!(outcome.response.pokemon.map(|p| p.len()), Some(1));
    }

    #[tokio::test]
    async fn store_order_is_preserved() {
        let mut stores = Stores::new();
        stores
            .pokemon
            .expect_list_in_bounds()
            .returning(|_, _, _| Ok(vec![pokemon("z", 3), pokemon("a", 1), pokemon("m", 2)]));

        let request = map_request(CategoryRequest {
            show_pokemon: true,
            ..Default::default()
        });
        let outcome = use_case(stores.into_storage())
            .execute(request, &caps(&[Capability::ViewMap, Capability::ViewMapPokemon]))
            .await
            .expect("outcome");

        let ids: Vec<String> = outcome
            .response
            .pokemon
            .expect("pokemon")
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[tokio::test]
    async fn pokemon_filters_need_only_view_map() {
        let stores = Stores::new();

        let request = MapDataRequest {
            categories: CategoryRequest {
                show_pokemon_filter: true,
                ..Default::default()
            },
            bounds: None,
            since: UpdateWatermark::ALL,
        };
        let outcome = use_case(stores.into_storage())
            .execute(request, &caps(&[Capability::ViewMap]))
            .await
            .expect("outcome");

        let filters = outcome.response.pokemon_filters.expect("filters");
        assert_eq!(filters.len(), 10);
        assert_eq!(filters[9].pokemon_id, "010");
    }

    // -------------------------------------------------------------------------
    // Partial failure
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn failed_category_is_omitted_and_reported() {
        let mut stores = Stores::new();
        stores
            .gyms
            .expect_list_in_bounds()
            .returning(|_, _, _| Err(RepoError::database("gym.list_in_bounds", "disk I/O error")));
        stores
            .pokemon
            .expect_list_in_bounds()
            .returning(|_, _, _| Ok(vec![pokemon("p1", 1)]));

        let request = map_request(CategoryRequest {
            show_gyms: true,
            show_pokemon: true,
            ..Default::default()
        });
        let outcome = use_case(stores.into_storage())
            .execute(
                request,
                &caps(&[
                    Capability::ViewMap,
                    Capability::ViewMapGym,
                    Capability::ViewMapPokemon,
                ]),
            )
            .await
            .expect("outcome");

        assert!(outcome.response.gyms.is_none());
        assert_eq!(outcome.response.pokemon.map(|p| p.len()), Some(1));
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].category, Category::Gyms);
        assert!(matches!(outcome.skipped[0].reason, SkipReason::Failed(_)));
    }

    #[tokio::test]
    async fn slow_category_times_out_like_a_failure() {
        let entity_stores = EntityStores {
            gyms: Arc::new(MockGymRepo::new()),
            pokestops: Arc::new(MockPokestopRepo::new()),
            pokemon: Arc::new(MockPokemonRepo::new()),
            spawnpoints: Arc::new(MockSpawnpointRepo::new()),
            fleet: Arc::new(SlowFleet),
        };
        let mut storage = MockStoragePort::new();
        storage
            .expect_connect()
            .returning(move || Ok(entity_stores.clone()));

        let outcome = use_case_with_timeout(storage, Duration::from_millis(20))
            .execute(admin_request(false), &caps(&[Capability::AdminSetting]))
            .await
            .expect("outcome");

        assert!(outcome.response.devices.is_none());
        assert_eq!(outcome.response.instances, Some(vec![]));
        assert_eq!(outcome.response.assignments, Some(vec![]));
        assert_eq!(
            outcome.skipped,
            vec![SkippedCategory {
                category: Category::Devices,
                reason: SkipReason::TimedOut,
            }]
        );
    }

    /// Fleet store whose device listing never finishes in time.
    struct SlowFleet;

    #[async_trait::async_trait]
    impl crate::infrastructure::ports::FleetRepo for SlowFleet {
        async fn list_devices(&self) -> Result<Vec<DeviceRecord>, RepoError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![])
        }

        async fn list_instances(&self) -> Result<Vec<rdm_domain::InstanceRecord>, RepoError> {
            Ok(vec![])
        }

        async fn list_assignments(&self) -> Result<Vec<AssignmentRecord>, RepoError> {
            Ok(vec![])
        }
    }

    // -------------------------------------------------------------------------
    // Admin rows
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn admin_rows_are_formatted_on_request() {
        let mut stores = Stores::new();
        stores.fleet.expect_list_devices().returning(|| {
            Ok(vec![DeviceRecord {
                uuid: "phone-a".to_string(),
                instance_name: Some("Downtown".to_string()),
                last_host: None,
                last_seen: 0,
                account_username: None,
            }])
        });
        stores.fleet.expect_list_instances().returning(|| Ok(vec![]));
        stores.fleet.expect_list_assignments().returning(|| {
            Ok(vec![AssignmentRecord {
                instance_name: "Downtown".to_string(),
                device_uuid: "phone-a".to_string(),
                time: 0,
            }])
        });

        let outcome = use_case(stores.into_storage())
            .execute(admin_request(true), &caps(&[Capability::AdminSetting]))
            .await
            .expect("outcome");

        let devices = outcome.response.devices.expect("devices");
        assert_eq!(
            devices[0].last_seen,
            TimeField::Formatted {
                timestamp: 0,
                formatted: String::new(),
            }
        );
        assert!(devices[0].buttons.is_some());

        let assignments = outcome.response.assignments.expect("assignments");
        assert_eq!(
            assignments[0].time,
            TimeField::Formatted {
                timestamp: 0,
                formatted: "On Complete".to_string(),
            }
        );
        assert_eq!(outcome.response.instances, Some(vec![]));
    }

    #[tokio::test]
    async fn identical_inputs_give_identical_payloads() {
        let mut stores = Stores::new();
        stores
            .pokemon
            .expect_list_in_bounds()
            .times(2)
            .returning(|_, _, _| Ok(vec![pokemon("p1", 1), pokemon("p2", 4)]));
        stores.fleet.expect_list_devices().times(2).returning(|| Ok(vec![]));

        let use_case = use_case(stores.into_storage());
        let request = MapDataRequest {
            categories: CategoryRequest {
                show_pokemon: true,
                show_devices: true,
                formatted: true,
                ..Default::default()
            },
            bounds: Some(viewport()),
            since: UpdateWatermark::ALL,
        };
        let caps = caps(&Capability::ALL);

        let first = use_case.execute(request.clone(), &caps).await.expect("first");
        let second = use_case.execute(request, &caps).await.expect("second");

        assert_eq!(
            serde_json::to_vec(&first.response).expect("serialize"),
            serde_json::to_vec(&second.response).expect("serialize")
        );
    }

    #[tokio::test]
    async fn timestamp_is_taken_from_the_clock() {
        let mut clock = MockClockPort::new();
        clock
            .expect_now()
            .times(1)
            .returning(|| chrono::DateTime::from_timestamp(1_234_567, 0).expect("instant"));
        let use_case = GetMapData::new(
            Arc::new(Stores::new().into_storage()),
            Arc::new(JsonLocalizer::builtin(FixedOffset::east_opt(0).expect("utc"))),
            Arc::new(HtmlFragmentRenderer::new()),
            Arc::new(clock),
            MapDataSettings {
                max_pokemon_id: 1,
                category_timeout: Duration::from_secs(5),
            },
        );
        let request = MapDataRequest {
            categories: CategoryRequest {
                show_pokemon_filter: true,
                ..Default::default()
            },
            bounds: None,
            since: UpdateWatermark::ALL,
        };

        let outcome = use_case
            .execute(request, &caps(&[Capability::ViewMap]))
            .await
            .expect("outcome");

        assert_eq!(outcome.response.timestamp, 1_234_567);
        assert_eq!(outcome.response.categories(), vec![Category::PokemonFilters]);
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn execute_future_can_cross_threads() {
        let use_case = use_case(MockStoragePort::new());
        let caps = caps(&[Capability::ViewMap]);
        let future = use_case.execute(MapDataRequest::default(), &caps);
        assert_send(&future);
    }
}
