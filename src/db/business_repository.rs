//! Business repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_db_timestamp, storage_error, BusinessStore};
use crate::models::{Business, TeamAssignment};
use crate::utils::AppResult;

#[derive(Debug, sqlx::FromRow)]
struct BusinessRow {
    id: String,
    name: String,
    description: String,
    phone: String,
    address: String,
    category: String,
    logo_url: String,
    owner_id: String,
    team_availability: String,
    created_at: String,
    updated_at: String,
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, description, phone, address, category, logo_url, owner_id,
           team_availability, created_at, updated_at
    FROM businesses
"#;

#[derive(Clone)]
pub struct BusinessRepository {
    pool: SqlitePool,
}

impl BusinessRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessStore for BusinessRepository {
    async fn list(&self) -> AppResult<Vec<Business>> {
        let rows = sqlx::query_as::<_, BusinessRow>(&format!("{} ORDER BY name", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list businesses")
            .map_err(storage_error)?;

        rows.into_iter()
            .map(row_to_business)
            .collect::<Result<Vec<_>>>()
            .map_err(storage_error)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Business>> {
        let row = sqlx::query_as::<_, BusinessRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get business")
            .map_err(storage_error)?;

        row.map(row_to_business).transpose().map_err(storage_error)
    }

    async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<Business>> {
        let rows = sqlx::query_as::<_, BusinessRow>(&format!(
            "{} WHERE owner_id = ? ORDER BY created_at",
            SELECT_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to query businesses by owner")
        .map_err(storage_error)?;

        rows.into_iter()
            .map(row_to_business)
            .collect::<Result<Vec<_>>>()
            .map_err(storage_error)
    }

    async fn insert(&self, business: &Business) -> AppResult<()> {
        let team = serde_json::to_string(&business.team_availability)
            .context("Failed to encode team availability")
            .map_err(storage_error)?;

        sqlx::query(
            r#"
            INSERT INTO businesses (
                id, name, description, phone, address, category, logo_url, owner_id,
                team_availability, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(business.id.to_string())
        .bind(&business.name)
        .bind(&business.description)
        .bind(&business.phone)
        .bind(&business.address)
        .bind(business.category.as_str())
        .bind(&business.logo_url)
        .bind(&business.owner_id)
        .bind(&team)
        .bind(business.created_at.to_rfc3339())
        .bind(business.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to create business")
        .map_err(storage_error)?;

        Ok(())
    }

    async fn update(&self, business: &Business) -> AppResult<bool> {
        let team = serde_json::to_string(&business.team_availability)
            .context("Failed to encode team availability")
            .map_err(storage_error)?;

        let result = sqlx::query(
            r#"
            UPDATE businesses
            SET name = ?, description = ?, phone = ?, address = ?, category = ?,
                logo_url = ?, team_availability = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&business.name)
        .bind(&business.description)
        .bind(&business.phone)
        .bind(&business.address)
        .bind(business.category.as_str())
        .bind(&business.logo_url)
        .bind(&team)
        .bind(business.updated_at.to_rfc3339())
        .bind(business.id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update business")
        .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM businesses WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete business")
            .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_business(row: BusinessRow) -> Result<Business> {
    let team_availability: Vec<TeamAssignment> = serde_json::from_str(&row.team_availability)
        .with_context(|| format!("Corrupt team availability for business {}", row.id))?;

    Ok(Business {
        id: Uuid::parse_str(&row.id).context("Invalid business ID")?,
        name: row.name,
        description: row.description,
        phone: row.phone,
        address: row.address,
        category: row
            .category
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?,
        logo_url: row.logo_url,
        owner_id: row.owner_id,
        team_availability,
        created_at: parse_db_timestamp(&row.created_at)?,
        updated_at: parse_db_timestamp(&row.updated_at)?,
    })
}
