//! Appointment model and lifecycle inputs
//!
//! An appointment embeds an [`AppointmentSnapshot`]: copies of the business,
//! service and team-member fields taken when the record was written. Later edits
//! to the live [`Service`](super::Service) or team profiles never reach it.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ServiceDuration;
use crate::utils::{AppError, AppResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Token selecting every current team member
pub const ALL_TEAM_MEMBERS: &str = "all";

/// Stored status; canceled appointments are deleted, not flagged
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Booked,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "booked",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booked" => Ok(AppointmentStatus::Booked),
            _ => Err(format!("Invalid appointment status: {}", s)),
        }
    }
}

/// Team member copied into an appointment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberSnapshot {
    pub id: String,
    pub display_name: String,
}

/// Denormalized business/service/team fields frozen at write time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSnapshot {
    pub business_name: String,
    pub service_id: Uuid,
    pub service_name: String,
    pub service_description: String,
    pub service_duration: ServiceDuration,
    /// Display label of `service_duration`, e.g. `Duration: 1 hours 0 minutes`
    #[serde(default)]
    pub duration: String,
    pub team_member_data: Vec<TeamMemberSnapshot>,
}

impl AppointmentSnapshot {
    pub fn set_service_duration(&mut self, duration: ServiceDuration) {
        self.duration = duration.label();
        self.service_duration = duration;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerContact {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub business_id: Uuid,
    #[serde(flatten)]
    pub snapshot: AppointmentSnapshot,
    pub date: NaiveDate,
    #[serde(with = "hour_minute")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    #[serde(flatten)]
    pub customer: CustomerContact,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Team-member selection as submitted by the booking flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamSelection {
    /// Every member of the business at commit time
    All,
    /// A single member identity
    Member(String),
    /// No member assigned
    Unassigned,
}

impl TeamSelection {
    pub fn from_input(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => TeamSelection::Unassigned,
            Some(ALL_TEAM_MEMBERS) => TeamSelection::All,
            Some(id) => TeamSelection::Member(id.to_string()),
        }
    }
}

/// Customer booking submission; fields arrive as free text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(default)]
    pub business_id: String,
    #[serde(default)]
    pub service_id: String,
    /// Member identity, `"all"`, or absent
    #[serde(default)]
    pub team_member: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
}

/// Admin edit; any subset of the denormalized fields may be replaced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    pub business_name: Option<String>,
    pub service_name: Option<String>,
    pub service_description: Option<String>,
    pub service_duration: Option<ServiceDuration>,
    pub team_member_data: Option<Vec<TeamMemberSnapshot>>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
}

impl AppointmentPatch {
    /// Apply onto a record; date/time must still parse in the stored formats
    pub fn apply_to(self, appointment: &mut Appointment) -> AppResult<()> {
        // Parse first so a bad value leaves the record untouched
        let date = self.date.as_deref().map(parse_date).transpose()?;
        let time = self.time.as_deref().map(parse_time).transpose()?;

        let snapshot = &mut appointment.snapshot;
        if let Some(v) = self.business_name {
            snapshot.business_name = v;
        }
        if let Some(v) = self.service_name {
            snapshot.service_name = v;
        }
        if let Some(v) = self.service_description {
            snapshot.service_description = v;
        }
        if let Some(v) = self.service_duration {
            snapshot.set_service_duration(v);
        }
        if let Some(v) = self.team_member_data {
            snapshot.team_member_data = v;
        }

        let customer = &mut appointment.customer;
        if let Some(v) = self.customer_name {
            customer.customer_name = v;
        }
        if let Some(v) = self.customer_email {
            customer.customer_email = v;
        }
        if let Some(v) = self.customer_phone {
            customer.customer_phone = v;
        }

        if let Some(d) = date {
            appointment.date = d;
        }
        if let Some(t) = time {
            appointment.time = t;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    pub date: String,
    pub time: String,
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::validation(format!("date must be YYYY-MM-DD, got '{}'", value)))
}

/// Parse an `HH:mm` local time
pub fn parse_time(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| AppError::validation(format!("time must be HH:mm, got '{}'", value)))
}

/// Serde adapter storing times as `HH:mm`
pub mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
