//! Business (tenant) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::slugify;

/// Business category as offered to owners
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BusinessCategory {
    #[serde(rename = "Beauty and Wellness")]
    BeautyAndWellness,
    #[serde(rename = "Sport")]
    Sport,
    #[serde(rename = "Personal Meetings and Services")]
    PersonalMeetingsAndServices,
    #[serde(rename = "Medical")]
    Medical,
    #[serde(rename = "Events and Entertainment")]
    EventsAndEntertainment,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Retailers")]
    Retailers,
    #[serde(rename = "Other Category")]
    OtherCategory,
}

impl BusinessCategory {
    pub const ALL: [BusinessCategory; 8] = [
        BusinessCategory::BeautyAndWellness,
        BusinessCategory::Sport,
        BusinessCategory::PersonalMeetingsAndServices,
        BusinessCategory::Medical,
        BusinessCategory::EventsAndEntertainment,
        BusinessCategory::Education,
        BusinessCategory::Retailers,
        BusinessCategory::OtherCategory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessCategory::BeautyAndWellness => "Beauty and Wellness",
            BusinessCategory::Sport => "Sport",
            BusinessCategory::PersonalMeetingsAndServices => "Personal Meetings and Services",
            BusinessCategory::Medical => "Medical",
            BusinessCategory::EventsAndEntertainment => "Events and Entertainment",
            BusinessCategory::Education => "Education",
            BusinessCategory::Retailers => "Retailers",
            BusinessCategory::OtherCategory => "Other Category",
        }
    }
}

impl std::fmt::Display for BusinessCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BusinessCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BusinessCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Invalid business category: {}", s))
    }
}

/// One entry of a business's team-availability mapping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeamAssignment {
    pub user_id: String,
    pub included: bool,
}

/// Business profile owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub phone: String,
    pub address: String,
    pub category: BusinessCategory,
    pub logo_url: String,
    pub owner_id: String,
    /// Ordered user-identity -> inclusion flag mapping
    pub team_availability: Vec<TeamAssignment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Referenced team identities in declaration order
    pub fn team_member_ids(&self) -> impl Iterator<Item = &str> {
        self.team_availability.iter().map(|a| a.user_id.as_str())
    }

    pub fn has_team_member(&self, user_id: &str) -> bool {
        self.team_member_ids().any(|id| id == user_id)
    }
}

/// Create/update business request; every field is required
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRequest {
    #[validate(length(min = 1, message = "name is required"))]
    #[serde(default)]
    pub name: String,
    #[validate(length(min = 1, message = "description is required"))]
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "phone is required"))]
    #[serde(default)]
    pub phone: String,
    #[validate(length(min = 1, message = "address is required"))]
    #[serde(default)]
    pub address: String,
    #[validate(length(min = 1, message = "category is required"))]
    #[serde(default)]
    pub category: String,
    #[validate(length(min = 1, message = "logo is required"))]
    #[serde(default)]
    pub logo_url: String,
}
