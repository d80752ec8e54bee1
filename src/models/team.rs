//! Team member profiles and weekly availability

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::utils::validation::slugify;

/// Status string meaning the member takes bookings on that day
pub const AVAILABLE: &str = "Available";

/// Shown for weekdays without a configured status
pub const NOT_SET: &str = "Not set";

/// User profile record; team members are users referenced by a business
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    /// Weekday name -> status string
    #[serde(default)]
    pub availability: HashMap<String, String>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn slug(&self) -> String {
        slugify(&self.display_name)
    }

    /// Configured status for a weekday, looked up case-insensitively
    pub fn status_on(&self, weekday: Weekday) -> Option<&str> {
        self.availability
            .iter()
            .find(|(day, _)| day.parse::<Weekday>().ok() == Some(weekday))
            .map(|(_, status)| status.as_str())
    }

    pub fn is_available_on(&self, date: NaiveDate) -> bool {
        self.status_on(date.weekday()) == Some(AVAILABLE)
    }
}

/// One day of a member's weekly availability, for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayStatus {
    pub day: String,
    pub status: String,
    pub available: bool,
}

/// Team member as presented to customers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberAvailability {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub days: Vec<DayStatus>,
    /// Set when a date was requested; informational only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_on_date: Option<bool>,
}

/// Upsert request for the caller's own profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub availability: HashMap<String, String>,
}
