//! Session store: token to permission mask.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::{RepoError, SessionRepo};

pub struct SqliteSessionRepo {
    pool: SqlitePool,
}

impl SqliteSessionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepo for SqliteSessionRepo {
    async fn get_permissions(&self, token: &str) -> Result<Option<u32>, RepoError> {
        let row = sqlx::query(
            "SELECT CASE WHEN typeof(perms) = 'integer' THEN perms END AS perms \
             FROM web_session WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("session.get_permissions", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw: Option<i64> = row
            .try_get("perms")
            .map_err(|e| RepoError::database("session.decode", e))?;

        // Out-of-range or non-integer masks grant nothing.
        Ok(raw.and_then(|mask| u32::try_from(mask).ok()))
    }
}
