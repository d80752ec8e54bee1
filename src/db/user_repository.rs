//! User profile repository

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{parse_db_timestamp, storage_error, UserStore};
use crate::models::UserProfile;
use crate::utils::AppResult;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    display_name: String,
    email: String,
    role: Option<String>,
    availability: String,
    updated_at: String,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn get(&self, id: &str) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, display_name, email, role, availability, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user profile")
        .map_err(storage_error)?;

        row.map(row_to_profile).transpose().map_err(storage_error)
    }

    async fn upsert(&self, profile: &UserProfile) -> AppResult<()> {
        let availability = serde_json::to_string(&profile.availability)
            .context("Failed to encode availability")
            .map_err(storage_error)?;

        sqlx::query(
            r#"
            INSERT INTO users (id, display_name, email, role, availability, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                display_name = excluded.display_name,
                email = excluded.email,
                role = excluded.role,
                availability = excluded.availability,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.display_name)
        .bind(&profile.email)
        .bind(&profile.role)
        .bind(&availability)
        .bind(profile.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save user profile")
        .map_err(storage_error)?;

        Ok(())
    }
}

fn row_to_profile(row: UserRow) -> Result<UserProfile> {
    let availability: HashMap<String, String> = serde_json::from_str(&row.availability)
        .with_context(|| format!("Corrupt availability for user {}", row.id))?;

    Ok(UserProfile {
        id: row.id,
        display_name: row.display_name,
        email: row.email,
        role: row.role,
        availability,
        updated_at: parse_db_timestamp(&row.updated_at)?,
    })
}
