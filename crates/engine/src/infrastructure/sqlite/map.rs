//! Viewport queries over the map tables.
//!
//! Every query is `bounds AND updated >= since`, ordered by primary key.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use rdm_domain::{
    GymQuery, GymRecord, MapBounds, PokemonRecord, PokestopQuery, PokestopRecord, QuestInfo,
    RaidInfo, SpawnpointRecord, UpdateWatermark,
};

use crate::infrastructure::ports::{
    ClockPort, GymRepo, PokemonRepo, PokestopRepo, RepoError, SpawnpointRepo,
};

/// `SELECT <columns> FROM <table> WHERE <bounds> AND updated >= ?`
fn viewport_query<'a>(
    columns: &str,
    table: &str,
    bounds: MapBounds,
    since: UpdateWatermark,
) -> QueryBuilder<'a, Sqlite> {
    let mut query = QueryBuilder::new(format!("SELECT {columns} FROM {table} WHERE lat BETWEEN "));
    query
        .push_bind(bounds.min_lat())
        .push(" AND ")
        .push_bind(bounds.max_lat())
        .push(" AND lon BETWEEN ")
        .push_bind(bounds.min_lon())
        .push(" AND ")
        .push_bind(bounds.max_lon())
        .push(" AND updated >= ")
        .push_bind(since.epoch_seconds());
    query
}

fn now_seconds(clock: &dyn ClockPort) -> u32 {
    u32::try_from(clock.now().timestamp()).unwrap_or_default()
}

// =============================================================================
// Gyms
// =============================================================================

const GYM_COLUMNS: &str = "id, lat, lon, name, url, team_id, available_slots, \
    guarding_pokemon_id, ex_raid_eligible, raid_level, raid_pokemon_id, \
    raid_spawn_timestamp, raid_battle_timestamp, raid_end_timestamp, updated";

pub struct SqliteGymRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteGymRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn gym_from_row(row: &SqliteRow) -> Result<GymRecord, sqlx::Error> {
    let raid_level: Option<u8> = row.try_get("raid_level")?;
    let raid_end: Option<u32> = row.try_get("raid_end_timestamp")?;
    let raid = match (raid_level, raid_end) {
        (Some(level), Some(end_timestamp)) => Some(RaidInfo {
            level,
            pokemon_id: row.try_get("raid_pokemon_id")?,
            spawn_timestamp: row
                .try_get::<Option<u32>, _>("raid_spawn_timestamp")?
                .unwrap_or_default(),
            battle_timestamp: row
                .try_get::<Option<u32>, _>("raid_battle_timestamp")?
                .unwrap_or_default(),
            end_timestamp,
        }),
        _ => None,
    };

    Ok(GymRecord {
        id: row.try_get("id")?,
        lat: row.try_get("lat")?,
        lon: row.try_get("lon")?,
        name: row.try_get("name")?,
        url: row.try_get("url")?,
        team_id: row.try_get("team_id")?,
        available_slots: row.try_get("available_slots")?,
        guarding_pokemon_id: row.try_get("guarding_pokemon_id")?,
        ex_raid_eligible: row.try_get("ex_raid_eligible")?,
        raid,
        updated: row.try_get("updated")?,
    })
}

#[async_trait]
impl GymRepo for SqliteGymRepo {
    async fn list_in_bounds(
        &self,
        bounds: MapBounds,
        since: UpdateWatermark,
        query: GymQuery,
    ) -> Result<Vec<GymRecord>, RepoError> {
        let mut builder = viewport_query(GYM_COLUMNS, "gym", bounds, since);
        if query.raids_only {
            builder
                .push(" AND raid_end_timestamp >= ")
                .push_bind(now_seconds(self.clock.as_ref()));
        }
        builder.push(" ORDER BY id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("gym.list_in_bounds", e))?;

        rows.iter()
            .map(|row| {
                let gym = gym_from_row(row).map_err(|e| RepoError::database("gym.decode", e))?;
                Ok(if query.show_raids { gym } else { gym.without_raid() })
            })
            .collect()
    }
}

// =============================================================================
// Pokestops
// =============================================================================

const POKESTOP_COLUMNS: &str = "id, lat, lon, name, url, lure_expire_timestamp, quest_type, \
    quest_target, quest_template, quest_reward_type, quest_item_id, quest_pokemon_id, updated";

pub struct SqlitePokestopRepo {
    pool: SqlitePool,
}

impl SqlitePokestopRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn pokestop_from_row(row: &SqliteRow) -> Result<PokestopRecord, sqlx::Error> {
    let quest_type: Option<u16> = row.try_get("quest_type")?;
    let quest = match quest_type {
        Some(quest_type) => Some(QuestInfo {
            quest_type,
            target: row
                .try_get::<Option<u16>, _>("quest_target")?
                .unwrap_or_default(),
            template: row
                .try_get::<Option<String>, _>("quest_template")?
                .unwrap_or_default(),
            reward_type: row.try_get("quest_reward_type")?,
            reward_item_id: row.try_get("quest_item_id")?,
            reward_pokemon_id: row.try_get("quest_pokemon_id")?,
        }),
        None => None,
    };

    Ok(PokestopRecord {
        id: row.try_get("id")?,
        lat: row.try_get("lat")?,
        lon: row.try_get("lon")?,
        name: row.try_get("name")?,
        url: row.try_get("url")?,
        lure_expire_timestamp: row.try_get("lure_expire_timestamp")?,
        quest,
        updated: row.try_get("updated")?,
    })
}

#[async_trait]
impl PokestopRepo for SqlitePokestopRepo {
    async fn list_in_bounds(
        &self,
        bounds: MapBounds,
        since: UpdateWatermark,
        query: PokestopQuery,
    ) -> Result<Vec<PokestopRecord>, RepoError> {
        let mut builder = viewport_query(POKESTOP_COLUMNS, "pokestop", bounds, since);
        if query.quests_only {
            builder.push(" AND quest_type IS NOT NULL");
        }
        builder.push(" ORDER BY id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("pokestop.list_in_bounds", e))?;

        rows.iter()
            .map(|row| {
                let stop = pokestop_from_row(row)
                    .map_err(|e| RepoError::database("pokestop.decode", e))?;
                Ok(if query.show_quests {
                    stop
                } else {
                    stop.without_quest()
                })
            })
            .collect()
    }
}

// =============================================================================
// Pokemon
// =============================================================================

const POKEMON_COLUMNS: &str = "id, pokemon_id, lat, lon, form, spawn_id, expire_timestamp, \
    atk_iv, def_iv, sta_iv, cp, level, updated";

pub struct SqlitePokemonRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqlitePokemonRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn pokemon_from_row(row: &SqliteRow) -> Result<PokemonRecord, sqlx::Error> {
    let spawn_id: Option<i64> = row.try_get("spawn_id")?;
    Ok(PokemonRecord {
        id: row.try_get("id")?,
        pokemon_id: row.try_get("pokemon_id")?,
        lat: row.try_get("lat")?,
        lon: row.try_get("lon")?,
        form: row.try_get("form")?,
        spawn_id: spawn_id.and_then(|id| u64::try_from(id).ok()),
        expire_timestamp: row.try_get("expire_timestamp")?,
        atk_iv: row.try_get("atk_iv")?,
        def_iv: row.try_get("def_iv")?,
        sta_iv: row.try_get("sta_iv")?,
        cp: row.try_get("cp")?,
        level: row.try_get("level")?,
        updated: row.try_get("updated")?,
    })
}

#[async_trait]
impl PokemonRepo for SqlitePokemonRepo {
    async fn list_in_bounds(
        &self,
        bounds: MapBounds,
        since: UpdateWatermark,
        exclude: &[u16],
    ) -> Result<Vec<PokemonRecord>, RepoError> {
        let mut builder = viewport_query(POKEMON_COLUMNS, "pokemon", bounds, since);
        builder
            .push(" AND expire_timestamp >= ")
            .push_bind(now_seconds(self.clock.as_ref()));

        if !exclude.is_empty() {
            builder.push(" AND pokemon_id NOT IN (");
            let mut ids = builder.separated(", ");
            for id in exclude {
                ids.push_bind(*id);
            }
            ids.push_unseparated(")");
        }
        builder.push(" ORDER BY id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("pokemon.list_in_bounds", e))?;

        rows.iter()
            .map(|row| pokemon_from_row(row).map_err(|e| RepoError::database("pokemon.decode", e)))
            .collect()
    }
}

// =============================================================================
// Spawnpoints
// =============================================================================

pub struct SqliteSpawnpointRepo {
    pool: SqlitePool,
}

impl SqliteSpawnpointRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn spawnpoint_from_row(row: &SqliteRow) -> Result<SpawnpointRecord, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    Ok(SpawnpointRecord {
        id: u64::try_from(id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        lat: row.try_get("lat")?,
        lon: row.try_get("lon")?,
        despawn_second: row.try_get("despawn_sec")?,
        updated: row.try_get("updated")?,
    })
}

#[async_trait]
impl SpawnpointRepo for SqliteSpawnpointRepo {
    async fn list_in_bounds(
        &self,
        bounds: MapBounds,
        since: UpdateWatermark,
    ) -> Result<Vec<SpawnpointRecord>, RepoError> {
        let mut builder =
            viewport_query("id, lat, lon, despawn_sec, updated", "spawnpoint", bounds, since);
        builder.push(" ORDER BY id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("spawnpoint.list_in_bounds", e))?;

        rows.iter()
            .map(|row| {
                spawnpoint_from_row(row).map_err(|e| RepoError::database("spawnpoint.decode", e))
            })
            .collect()
    }
}
