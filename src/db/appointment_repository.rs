//! Appointment repository
//!
//! Appointments are stored whole: every write replaces the full denormalized row.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_db_timestamp, storage_error, AppointmentStore};
use crate::models::{
    Appointment, AppointmentSnapshot, AppointmentStatus, CustomerContact, ServiceDuration,
    TeamMemberSnapshot, DATE_FORMAT, TIME_FORMAT,
};
use crate::utils::AppResult;

#[derive(Debug, sqlx::FromRow)]
struct AppointmentRow {
    id: String,
    business_id: String,
    business_name: String,
    service_id: String,
    service_name: String,
    service_description: String,
    duration_hours: i64,
    duration_minutes: i64,
    duration_label: String,
    team_member_data: String,
    date: String,
    time: String,
    status: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    created_at: String,
    updated_at: String,
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, business_id, business_name, service_id, service_name, service_description,
           duration_hours, duration_minutes, duration_label, team_member_data, date, time,
           status, customer_name, customer_email, customer_phone, created_at, updated_at
    FROM appointments
"#;

#[derive(Clone)]
pub struct AppointmentRepository {
    pool: SqlitePool,
}

impl AppointmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for AppointmentRepository {
    async fn get(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        let row =
            sqlx::query_as::<_, AppointmentRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .context("Failed to get appointment")
                .map_err(storage_error)?;

        row.map(row_to_appointment).transpose().map_err(storage_error)
    }

    async fn list_by_business_and_status(
        &self,
        business_id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{} WHERE business_id = ? AND status = ? ORDER BY date, time",
            SELECT_COLUMNS
        ))
        .bind(business_id.to_string())
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list appointments")
        .map_err(storage_error)?;

        rows.into_iter()
            .map(row_to_appointment)
            .collect::<Result<Vec<_>>>()
            .map_err(storage_error)
    }

    async fn insert(&self, appointment: &Appointment) -> AppResult<()> {
        let snapshot = &appointment.snapshot;
        let team = serde_json::to_string(&snapshot.team_member_data)
            .context("Failed to encode team member data")
            .map_err(storage_error)?;

        sqlx::query(
            r#"
            INSERT INTO appointments (
                id, business_id, business_name, service_id, service_name, service_description,
                duration_hours, duration_minutes, duration_label, team_member_data, date,
                time, status, customer_name, customer_email, customer_phone, created_at,
                updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(appointment.id.to_string())
        .bind(appointment.business_id.to_string())
        .bind(&snapshot.business_name)
        .bind(snapshot.service_id.to_string())
        .bind(&snapshot.service_name)
        .bind(&snapshot.service_description)
        .bind(i64::from(snapshot.service_duration.hours))
        .bind(i64::from(snapshot.service_duration.minutes))
        .bind(&snapshot.duration)
        .bind(&team)
        .bind(appointment.date.format(DATE_FORMAT).to_string())
        .bind(appointment.time.format(TIME_FORMAT).to_string())
        .bind(appointment.status.as_str())
        .bind(&appointment.customer.customer_name)
        .bind(&appointment.customer.customer_email)
        .bind(&appointment.customer.customer_phone)
        .bind(appointment.created_at.to_rfc3339())
        .bind(appointment.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to create appointment")
        .map_err(storage_error)?;

        Ok(())
    }

    async fn update(&self, appointment: &Appointment) -> AppResult<bool> {
        let snapshot = &appointment.snapshot;
        let team = serde_json::to_string(&snapshot.team_member_data)
            .context("Failed to encode team member data")
            .map_err(storage_error)?;

        let result = sqlx::query(
            r#"
            UPDATE appointments
            SET business_name = ?, service_id = ?, service_name = ?, service_description = ?,
                duration_hours = ?, duration_minutes = ?, duration_label = ?,
                team_member_data = ?, date = ?, time = ?, status = ?, customer_name = ?, customer_email = ?,
                customer_phone = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&snapshot.business_name)
        .bind(snapshot.service_id.to_string())
        .bind(&snapshot.service_name)
        .bind(&snapshot.service_description)
        .bind(i64::from(snapshot.service_duration.hours))
        .bind(i64::from(snapshot.service_duration.minutes))
        .bind(&snapshot.duration)
        .bind(&team)
        .bind(appointment.date.format(DATE_FORMAT).to_string())
        .bind(appointment.time.format(TIME_FORMAT).to_string())
        .bind(appointment.status.as_str())
        .bind(&appointment.customer.customer_name)
        .bind(&appointment.customer.customer_email)
        .bind(&appointment.customer.customer_phone)
        .bind(appointment.updated_at.to_rfc3339())
        .bind(appointment.id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update appointment")
        .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete appointment")
            .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_appointment(row: AppointmentRow) -> Result<Appointment> {
    let team_member_data: Vec<TeamMemberSnapshot> = serde_json::from_str(&row.team_member_data)
        .with_context(|| format!("Corrupt team member data for appointment {}", row.id))?;

    Ok(Appointment {
        id: Uuid::parse_str(&row.id).context("Invalid appointment ID")?,
        business_id: Uuid::parse_str(&row.business_id).context("Invalid business ID")?,
        snapshot: AppointmentSnapshot {
            business_name: row.business_name,
            service_id: Uuid::parse_str(&row.service_id).context("Invalid service ID")?,
            service_name: row.service_name,
            service_description: row.service_description,
            service_duration: ServiceDuration::new(
                u32::try_from(row.duration_hours).context("Negative duration hours")?,
                u32::try_from(row.duration_minutes).context("Negative duration minutes")?,
            ),
            duration: row.duration_label,
            team_member_data,
        },
        date: NaiveDate::parse_from_str(&row.date, DATE_FORMAT)
            .with_context(|| format!("Invalid appointment date: {}", row.date))?,
        time: NaiveTime::parse_from_str(&row.time, TIME_FORMAT)
            .with_context(|| format!("Invalid appointment time: {}", row.time))?,
        status: row
            .status
            .parse::<AppointmentStatus>()
            .map_err(|e| anyhow::anyhow!(e))?,
        customer: CustomerContact {
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
        },
        created_at: parse_db_timestamp(&row.created_at)?,
        updated_at: parse_db_timestamp(&row.updated_at)?,
    })
}
