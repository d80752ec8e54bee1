//! Outbound notification payloads

use serde::{Deserialize, Serialize};

use super::Appointment;

/// Lifecycle event a notification describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationAction {
    Confirmed,
    Updated,
    Canceled,
}

impl NotificationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationAction::Confirmed => "confirmed",
            NotificationAction::Updated => "updated",
            NotificationAction::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for NotificationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role of the party credited with the action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Admin,
    Team,
}

/// Body POSTed to the notification endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub customer_email: String,
    pub customer_name: String,
    pub appointment: Appointment,
    pub action: NotificationAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_role: Option<ActorRole>,
}

impl NotificationRequest {
    pub fn new(appointment: &Appointment, action: NotificationAction) -> Self {
        Self {
            customer_email: appointment.customer.customer_email.clone(),
            customer_name: appointment.customer.customer_name.clone(),
            appointment: appointment.clone(),
            action,
            actor: None,
            actor_role: None,
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>, role: ActorRole) -> Self {
        self.actor = Some(actor.into());
        self.actor_role = Some(role);
        self
    }
}

/// Endpoint reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub success: bool,
}

/// Result of the dispatch that follows a committed change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Delivered,
    /// The change stands; the message is surfaced as a warning
    Failed(String),
}

impl NotificationOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, NotificationOutcome::Delivered)
    }
}

#[derive(Serialize)]
struct OutcomeBody<'a> {
    delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<&'a str>,
}

impl Serialize for NotificationOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = match self {
            NotificationOutcome::Delivered => OutcomeBody {
                delivered: true,
                warning: None,
            },
            NotificationOutcome::Failed(msg) => OutcomeBody {
                delivered: false,
                warning: Some(msg),
            },
        };
        body.serialize(serializer)
    }
}
