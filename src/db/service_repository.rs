//! Service repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_db_timestamp, storage_error, ServiceStore};
use crate::models::{Service, ServiceDuration};
use crate::utils::AppResult;

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: String,
    business_id: String,
    name: String,
    description: String,
    duration_hours: i64,
    duration_minutes: i64,
    created_at: String,
    updated_at: String,
}

#[derive(Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceStore for ServiceRepository {
    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<Service>> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            r#"
            SELECT id, business_id, name, description, duration_hours, duration_minutes,
                   created_at, updated_at
            FROM services
            WHERE business_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(business_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list services")
        .map_err(storage_error)?;

        rows.into_iter()
            .map(row_to_service)
            .collect::<Result<Vec<_>>>()
            .map_err(storage_error)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Service>> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r#"
            SELECT id, business_id, name, description, duration_hours, duration_minutes,
                   created_at, updated_at
            FROM services
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get service")
        .map_err(storage_error)?;

        row.map(row_to_service).transpose().map_err(storage_error)
    }

    async fn insert(&self, service: &Service) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO services (
                id, business_id, name, description, duration_hours, duration_minutes,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(service.id.to_string())
        .bind(service.business_id.to_string())
        .bind(&service.name)
        .bind(&service.description)
        .bind(i64::from(service.duration.hours))
        .bind(i64::from(service.duration.minutes))
        .bind(service.created_at.to_rfc3339())
        .bind(service.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to create service")
        .map_err(storage_error)?;

        Ok(())
    }

    async fn update(&self, service: &Service) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE services
            SET name = ?, description = ?, duration_hours = ?, duration_minutes = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&service.name)
        .bind(&service.description)
        .bind(i64::from(service.duration.hours))
        .bind(i64::from(service.duration.minutes))
        .bind(service.updated_at.to_rfc3339())
        .bind(service.id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update service")
        .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete service")
            .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_service(row: ServiceRow) -> Result<Service> {
    Ok(Service {
        id: Uuid::parse_str(&row.id).context("Invalid service ID")?,
        business_id: Uuid::parse_str(&row.business_id).context("Invalid business ID")?,
        name: row.name,
        description: row.description,
        duration: ServiceDuration::new(
            u32::try_from(row.duration_hours).context("Negative duration hours")?,
            u32::try_from(row.duration_minutes).context("Negative duration minutes")?,
        ),
        created_at: parse_db_timestamp(&row.created_at)?,
        updated_at: parse_db_timestamp(&row.updated_at)?,
    })
}
