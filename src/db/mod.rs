//! Database layer
//!
//! SQLite backs the four document collections:
//! - `businesses` (with the ordered team-availability mapping)
//! - `services`
//! - `appointments` (denormalized snapshots)
//! - `users` (profiles and weekly availability)
//!
//! The lifecycle services only see the [`store`] traits.

pub mod appointment_repository;
pub mod business_repository;
pub mod service_repository;
pub mod store;
pub mod user_repository;

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::DatabaseConfig;
use crate::utils::AppError;

pub use appointment_repository::AppointmentRepository;
pub use business_repository::BusinessRepository;
pub use service_repository::ServiceRepository;
pub use store::{AppointmentStore, BusinessStore, ServiceStore, Stores, UserStore};
pub use user_repository::UserRepository;

/// Database connection pool type
pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool and run migrations
pub async fn init_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("Invalid database URL: {}", config.url))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

/// Cheap round trip used by readiness checks
pub async fn check_health(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Database health check failed")?;
    Ok(())
}

pub(crate) fn storage_error(err: anyhow::Error) -> AppError {
    AppError::Storage(format!("{:#}", err))
}

pub(crate) fn parse_db_timestamp(ts: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("Invalid timestamp in database: {}", ts))?;
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}
