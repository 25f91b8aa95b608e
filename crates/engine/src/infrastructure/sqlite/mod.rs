//! SQLite-backed entity and session storage.
//!
//! One pool per process. The map tables are written by the scanner side of
//! the system; this engine only reads them.

mod fleet;
mod map;
mod session;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Connection, SqlitePool};

use crate::infrastructure::ports::{ClockPort, EntityStores, RepoError, StoragePort};

pub use fleet::SqliteFleetRepo;
pub use map::{SqliteGymRepo, SqlitePokemonRepo, SqlitePokestopRepo, SqliteSpawnpointRepo};
pub use session::SqliteSessionRepo;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS gym (
        id TEXT PRIMARY KEY,
        lat REAL NOT NULL,
        lon REAL NOT NULL,
        name TEXT,
        url TEXT,
        team_id INTEGER,
        available_slots INTEGER,
        guarding_pokemon_id INTEGER,
        ex_raid_eligible INTEGER NOT NULL DEFAULT 0,
        raid_level INTEGER,
        raid_pokemon_id INTEGER,
        raid_spawn_timestamp INTEGER,
        raid_battle_timestamp INTEGER,
        raid_end_timestamp INTEGER,
        updated INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pokestop (
        id TEXT PRIMARY KEY,
        lat REAL NOT NULL,
        lon REAL NOT NULL,
        name TEXT,
        url TEXT,
        lure_expire_timestamp INTEGER,
        quest_type INTEGER,
        quest_target INTEGER,
        quest_template TEXT,
        quest_reward_type INTEGER,
        quest_item_id INTEGER,
        quest_pokemon_id INTEGER,
        updated INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pokemon (
        id TEXT PRIMARY KEY,
        pokemon_id INTEGER NOT NULL,
        lat REAL NOT NULL,
        lon REAL NOT NULL,
        form INTEGER,
        spawn_id INTEGER,
        expire_timestamp INTEGER NOT NULL,
        atk_iv INTEGER,
        def_iv INTEGER,
        sta_iv INTEGER,
        cp INTEGER,
        level INTEGER,
        updated INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS spawnpoint (
        id INTEGER PRIMARY KEY,
        lat REAL NOT NULL,
        lon REAL NOT NULL,
        despawn_sec INTEGER,
        updated INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS device (
        uuid TEXT PRIMARY KEY,
        instance_name TEXT,
        last_host TEXT,
        last_seen INTEGER NOT NULL DEFAULT 0,
        account_username TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS instance (
        name TEXT PRIMARY KEY,
        type TEXT NOT NULL,
        status TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS assignment (
        instance_name TEXT NOT NULL,
        device_uuid TEXT NOT NULL,
        time INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (instance_name, device_uuid, time)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS web_session (
        token TEXT PRIMARY KEY,
        perms INTEGER
    )
    "#,
];

/// Process-wide SQLite storage.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteStorage {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(RepoError::unavailable)?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| RepoError::database("schema", e))?;
        }

        Ok(Self { pool, clock })
    }

    pub fn session_repo(&self) -> SqliteSessionRepo {
        SqliteSessionRepo::new(self.pool.clone())
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    #[cfg(test)]
    pub(crate) async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl StoragePort for SqliteStorage {
    async fn connect(&self) -> Result<EntityStores, RepoError> {
        // Prove the backend answers before any category query is dispatched.
        let mut conn = self.pool.acquire().await.map_err(RepoError::unavailable)?;
        conn.ping().await.map_err(RepoError::unavailable)?;
        drop(conn);

        Ok(EntityStores {
            gyms: Arc::new(SqliteGymRepo::new(self.pool.clone(), self.clock.clone())),
            pokestops: Arc::new(SqlitePokestopRepo::new(self.pool.clone())),
            pokemon: Arc::new(SqlitePokemonRepo::new(self.pool.clone(), self.clock.clone())),
            spawnpoints: Arc::new(SqliteSpawnpointRepo::new(self.pool.clone())),
            fleet: Arc::new(SqliteFleetRepo::new(self.pool.clone())),
        })
    }
}
