//! Devices, instances, and assignments.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use rdm_domain::{AssignmentRecord, DeviceRecord, InstanceRecord, InstanceType};

use crate::infrastructure::ports::{FleetRepo, RepoError};

pub struct SqliteFleetRepo {
    pool: SqlitePool,
}

impl SqliteFleetRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn device_from_row(row: &SqliteRow) -> Result<DeviceRecord, sqlx::Error> {
    Ok(DeviceRecord {
        uuid: row.try_get("uuid")?,
        instance_name: row.try_get("instance_name")?,
        last_host: row.try_get("last_host")?,
        last_seen: row.try_get("last_seen")?,
        account_username: row.try_get("account_username")?,
    })
}

fn instance_from_row(row: &SqliteRow) -> Result<InstanceRecord, RepoError> {
    let decode = |e: sqlx::Error| RepoError::database("instance.decode", e);
    let kind: String = row.try_get("type").map_err(decode)?;
    Ok(InstanceRecord {
        name: row.try_get("name").map_err(decode)?,
        instance_type: kind
            .parse::<InstanceType>()
            .map_err(RepoError::serialization)?,
        status: row.try_get("status").map_err(decode)?,
    })
}

fn assignment_from_row(row: &SqliteRow) -> Result<AssignmentRecord, sqlx::Error> {
    Ok(AssignmentRecord {
        instance_name: row.try_get("instance_name")?,
        device_uuid: row.try_get("device_uuid")?,
        time: row.try_get("time")?,
    })
}

#[async_trait]
impl FleetRepo for SqliteFleetRepo {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT uuid, instance_name, last_host, last_seen, account_username
            FROM device
            ORDER BY uuid
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("device.list", e))?;

        rows.iter()
            .map(|row| device_from_row(row).map_err(|e| RepoError::database("device.decode", e)))
            .collect()
    }

    async fn list_instances(&self) -> Result<Vec<InstanceRecord>, RepoError> {
        let rows = sqlx::query("SELECT name, type, status FROM instance ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("instance.list", e))?;

        rows.iter().map(instance_from_row).collect()
    }

    async fn list_assignments(&self) -> Result<Vec<AssignmentRecord>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT instance_name, device_uuid, time
            FROM assignment
            ORDER BY instance_name, device_uuid, time
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("assignment.list", e))?;

        rows.iter()
            .map(|row| {
                assignment_from_row(row).map_err(|e| RepoError::database("assignment.decode", e))
            })
            .collect()
    }
}
