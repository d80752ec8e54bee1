//! Explicit session context passed into lifecycle operations

use serde::{Deserialize, Serialize};

/// Role claimed by the identity provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Team,
    Customer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Team => "team",
            UserRole::Customer => "customer",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "team" => Ok(UserRole::Team),
            "customer" => Ok(UserRole::Customer),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Acting user for one call, resolved by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: Option<String>,
    /// Display name from the user's profile, when one exists
    pub display_name: Option<String>,
}

impl SessionContext {
    /// Unauthenticated visitor (customer booking flow)
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            display_name,
        }
    }

    /// Display name, or `fallback` when the profile had none
    pub fn actor_label(&self, fallback: &str) -> String {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}
