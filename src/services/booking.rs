//! Appointment lifecycle manager
//!
//! Owns the create, edit, reschedule and cancel transitions. Each transition
//! commits a single-document write and is followed by exactly one notification
//! dispatch. A failed dispatch never undoes the committed write; it is reported
//! back in [`LifecycleOutcome::notification`].

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::availability::AvailabilityResolver;
use super::notification::NotificationDispatcher;
use crate::config::NotificationConfig;
use crate::db::{AppointmentStore, BusinessStore, ServiceStore};
use crate::models::{
    parse_date, parse_time, ActorRole, Appointment, AppointmentPatch, AppointmentSnapshot,
    AppointmentStatus, BookingRequest, Business, CustomerContact, NotificationAction,
    NotificationOutcome, NotificationRequest, RescheduleRequest, SessionContext, TeamSelection,
};
use crate::utils::validation::{is_blank, validate_email, validate_phone};
use crate::utils::{AppError, AppResult};

/// A committed record together with the result of its notification
#[derive(Debug, Clone, serde::Serialize)]
pub struct LifecycleOutcome<T> {
    #[serde(rename = "appointment")]
    pub record: T,
    pub notification: NotificationOutcome,
}

/// Actor names attached to outgoing notifications
#[derive(Debug, Clone)]
pub struct ActorLabels {
    /// Used for owner actions when the session has no display name
    pub default_actor: String,
    /// Credited with customer booking confirmations
    pub booking_actor: String,
}

impl From<&NotificationConfig> for ActorLabels {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            default_actor: config.default_actor_label.clone(),
            booking_actor: config.booking_actor_label.clone(),
        }
    }
}

pub struct BookingService {
    businesses: Arc<dyn BusinessStore>,
    services: Arc<dyn ServiceStore>,
    appointments: Arc<dyn AppointmentStore>,
    resolver: AvailabilityResolver,
    notifier: Arc<dyn NotificationDispatcher>,
    labels: ActorLabels,
}

impl BookingService {
    pub fn new(
        businesses: Arc<dyn BusinessStore>,
        services: Arc<dyn ServiceStore>,
        appointments: Arc<dyn AppointmentStore>,
        resolver: AvailabilityResolver,
        notifier: Arc<dyn NotificationDispatcher>,
        labels: ActorLabels,
    ) -> Self {
        Self {
            businesses,
            services,
            appointments,
            resolver,
            notifier,
            labels,
        }
    }

    /// Customer booking: validate, snapshot, persist, then send `confirmed`
    pub async fn create(
        &self,
        session: &SessionContext,
        request: BookingRequest,
    ) -> AppResult<LifecycleOutcome<Appointment>> {
        let (business_id, service_id) = validate_booking(&request)?;
        let date = parse_date(&request.date)?;
        let time = parse_time(&request.time)?;

        let business = self
            .businesses
            .get(business_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Business {} not found", business_id)))?;

        let service = self
            .services
            .get(service_id)
            .await?
            .filter(|s| s.business_id == business.id)
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Service {} not found for business {}",
                    service_id, business.id
                ))
            })?;

        let selection = TeamSelection::from_input(request.team_member.as_deref());
        let team_member_data = self.resolver.select(&business, &selection).await?;

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            business_id: business.id,
            snapshot: AppointmentSnapshot {
                business_name: business.name.clone(),
                service_id: service.id,
                service_name: service.name,
                service_description: service.description,
                service_duration: service.duration,
                duration: service.duration.label(),
                team_member_data,
            },
            date,
            time,
            status: AppointmentStatus::Booked,
            customer: CustomerContact {
                customer_name: request.customer_name.trim().to_string(),
                customer_email: request.customer_email.trim().to_string(),
                customer_phone: request.customer_phone.trim().to_string(),
            },
            created_at: now,
            updated_at: now,
        };

        self.appointments.insert(&appointment).await?;
        info!(
            appointment_id = %appointment.id,
            business_id = %appointment.business_id,
            booked_by = session.user_id.as_deref().unwrap_or("anonymous"),
            "Appointment booked for {} {}",
            appointment.date,
            appointment.time.format("%H:%M")
        );

        let notification = self
            .notify(
                NotificationRequest::new(&appointment, NotificationAction::Confirmed)
                    .with_actor(&self.labels.booking_actor, ActorRole::Admin),
            )
            .await;

        Ok(LifecycleOutcome {
            record: appointment,
            notification,
        })
    }

    /// Owner-scoped read of a single appointment
    pub async fn get(&self, session: &SessionContext, id: Uuid) -> AppResult<Appointment> {
        self.owned_appointment(session, id).await
    }

    /// Replace any subset of the denormalized fields in place
    pub async fn edit(
        &self,
        session: &SessionContext,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> AppResult<LifecycleOutcome<Appointment>> {
        let mut appointment = self.owned_appointment(session, id).await?;
        patch.apply_to(&mut appointment)?;
        self.commit_update(session, appointment, "edited").await
    }

    /// Move an appointment to a new date and time, keeping its identity
    pub async fn reschedule(
        &self,
        session: &SessionContext,
        id: Uuid,
        request: RescheduleRequest,
    ) -> AppResult<LifecycleOutcome<Appointment>> {
        let date = parse_date(&request.date)?;
        let time = parse_time(&request.time)?;

        let mut appointment = self.owned_appointment(session, id).await?;
        appointment.date = date;
        appointment.time = time;
        self.commit_update(session, appointment, "rescheduled").await
    }

    /// Cancel by deleting the record. Returns the appointment as it was.
    pub async fn cancel(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> AppResult<LifecycleOutcome<Appointment>> {
        let appointment = self.owned_appointment(session, id).await?;

        if !self.appointments.delete(id).await? {
            return Err(AppError::not_found(format!("Appointment {} not found", id)));
        }
        info!(appointment_id = %id, "Appointment canceled and removed");

        let notification = self
            .notify(NotificationRequest::new(
                &appointment,
                NotificationAction::Canceled,
            ))
            .await;

        Ok(LifecycleOutcome {
            record: appointment,
            notification,
        })
    }

    /// Booked appointments of the caller's business
    pub async fn list_booked_for_owner(
        &self,
        session: &SessionContext,
    ) -> AppResult<Vec<Appointment>> {
        let business = self.owner_business(session).await?;
        self.appointments
            .list_by_business_and_status(business.id, AppointmentStatus::Booked)
            .await
    }

    async fn commit_update(
        &self,
        session: &SessionContext,
        mut appointment: Appointment,
        verb: &str,
    ) -> AppResult<LifecycleOutcome<Appointment>> {
        appointment.updated_at = Utc::now();

        if !self.appointments.update(&appointment).await? {
            return Err(AppError::not_found(format!(
                "Appointment {} not found",
                appointment.id
            )));
        }
        info!(appointment_id = %appointment.id, "Appointment {}", verb);

        let actor = session.actor_label(&self.labels.default_actor);
        let notification = self
            .notify(
                NotificationRequest::new(&appointment, NotificationAction::Updated)
                    .with_actor(actor, ActorRole::Team),
            )
            .await;

        Ok(LifecycleOutcome {
            record: appointment,
            notification,
        })
    }

    async fn owner_business(&self, session: &SessionContext) -> AppResult<Business> {
        let owner = session
            .user_id
            .as_deref()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        self.businesses
            .find_by_owner(owner)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found("No businesses found for the user."))
    }

    /// Appointments of other businesses are reported as absent
    async fn owned_appointment(&self, session: &SessionContext, id: Uuid) -> AppResult<Appointment> {
        let business = self.owner_business(session).await?;

        self.appointments
            .get(id)
            .await?
            .filter(|a| a.business_id == business.id)
            .ok_or_else(|| AppError::not_found(format!("Appointment {} not found", id)))
    }

    async fn notify(&self, request: NotificationRequest) -> NotificationOutcome {
        match self.notifier.dispatch(&request).await {
            Ok(()) => NotificationOutcome::Delivered,
            Err(e) => {
                warn!(
                    appointment_id = %request.appointment.id,
                    action = %request.action,
                    "Notification dispatch failed: {}",
                    e
                );
                NotificationOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Required-field and format checks; nothing is written when this fails
fn validate_booking(request: &BookingRequest) -> AppResult<(Uuid, Uuid)> {
    let mut problems = Vec::new();

    let required = [
        ("businessId", &request.business_id),
        ("serviceId", &request.service_id),
        ("date", &request.date),
        ("time", &request.time),
        ("customerName", &request.customer_name),
        ("customerEmail", &request.customer_email),
        ("customerPhone", &request.customer_phone),
    ];
    for (field, value) in required {
        if is_blank(value) {
            problems.push(format!("{} is required", field));
        }
    }

    if !is_blank(&request.customer_email) && !validate_email(request.customer_email.trim()) {
        problems.push("customerEmail is not a valid email address".to_string());
    }
    if !is_blank(&request.customer_phone) && !validate_phone(request.customer_phone.trim()) {
        problems.push("customerPhone contains invalid characters".to_string());
    }

    let business_id = parse_id("businessId", &request.business_id, &mut problems);
    let service_id = parse_id("serviceId", &request.service_id, &mut problems);

    match (business_id, service_id) {
        (Some(b), Some(s)) if problems.is_empty() => Ok((b, s)),
        _ => Err(AppError::validation(problems.join("; "))),
    }
}

fn parse_id(field: &str, value: &str, problems: &mut Vec<String>) -> Option<Uuid> {
    if is_blank(value) {
        return None;
    }
    match Uuid::parse_str(value.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            problems.push(format!("{} is not a valid identifier", field));
            None
        }
    }
}
