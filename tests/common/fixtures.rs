//! Test fixtures for common test data
//!
//! Fixed identities and documents shared across tests.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use appointly::models::{
    Business, BusinessCategory, Service, ServiceDuration, TeamAssignment, UserProfile,
};

pub const TEST_SECRET: &str = "test_secret_key_that_is_at_least_32_bytes_long";

/// Fixed identities for reproducible tests
pub mod ids {
    use uuid::Uuid;

    pub const OWNER_ID: &str = "owner-ana";
    pub const OTHER_OWNER_ID: &str = "owner-bo";
    pub const MEMBER_ID: &str = "member-maria";
    pub const SECOND_MEMBER_ID: &str = "member-li";
    pub const BUSINESS_ID: Uuid = Uuid::from_u128(0x0b0b0b0b_1234_4234_8234_123456789abc);
    pub const SERVICE_ID: Uuid = Uuid::from_u128(0x5e5e5e5e_abcd_4bcd_8bcd_abcdef123456);
}

/// Monday 2026-10-19
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

pub struct ProfileFixtures;

impl ProfileFixtures {
    /// Team member available on Mondays only
    pub fn maria() -> UserProfile {
        profile(ids::MEMBER_ID, "Maria Lopez", &[("Monday", "Available")])
    }

    pub fn li() -> UserProfile {
        profile(
            ids::SECOND_MEMBER_ID,
            "Li Wei",
            &[("Monday", "Busy"), ("Tuesday", "Available")],
        )
    }

    pub fn owner() -> UserProfile {
        profile(ids::OWNER_ID, "Ana Owner", &[])
    }
}

pub fn profile(id: &str, display_name: &str, availability: &[(&str, &str)]) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        display_name: display_name.to_string(),
        email: format!("{}@example.com", id),
        role: Some("team".to_string()),
        availability: availability
            .iter()
            .map(|(day, status)| (day.to_string(), status.to_string()))
            .collect::<HashMap<_, _>>(),
        updated_at: Utc::now(),
    }
}

pub struct BusinessFixtures;

impl BusinessFixtures {
    /// "Glow Studio" owned by [`ids::OWNER_ID`] with the given team, in order
    pub fn glow_studio(team: &[&str]) -> Business {
        let now = Utc::now();
        Business {
            id: ids::BUSINESS_ID,
            name: "Glow Studio".to_string(),
            description: "Hair and nails".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
            category: BusinessCategory::BeautyAndWellness,
            logo_url: "logos/glow.png".to_string(),
            owner_id: ids::OWNER_ID.to_string(),
            team_availability: team
                .iter()
                .map(|id| TeamAssignment {
                    user_id: id.to_string(),
                    included: true,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    /// One-hour haircut offered by [`Self::glow_studio`]
    pub fn haircut() -> Service {
        let now = Utc::now();
        Service {
            id: ids::SERVICE_ID,
            business_id: ids::BUSINESS_ID,
            name: "Haircut".to_string(),
            description: "Wash and cut".to_string(),
            duration: ServiceDuration::new(1, 0),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn other_business() -> Business {
        Business {
            id: Uuid::new_v4(),
            name: "Iron Gym".to_string(),
            category: BusinessCategory::Sport,
            owner_id: ids::OTHER_OWNER_ID.to_string(),
            team_availability: Vec::new(),
            ..Self::glow_studio(&[])
        }
    }
}

/// Request bodies for the HTTP surface
pub mod bodies {
    use super::*;

    pub fn business(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "description": "Hair and nails",
            "phone": "555-0100",
            "address": "1 Main St",
            "category": "Beauty and Wellness",
            "logoUrl": "logos/glow.png"
        })
    }

    pub fn service(name: &str, hours: u32, minutes: u32) -> serde_json::Value {
        json!({
            "name": name,
            "description": format!("{} service", name),
            "duration": {"hours": hours, "minutes": minutes}
        })
    }

    pub fn profile(display_name: &str, availability: serde_json::Value) -> serde_json::Value {
        json!({
            "displayName": display_name,
            "email": format!("{}@example.com", display_name.to_lowercase().replace(' ', ".")),
            "availability": availability
        })
    }
}
