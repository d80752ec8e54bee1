//! Availability resolver
//!
//! Resolves a business's team-availability mapping into member profiles, in
//! declaration order. Availability is informational; existing appointments are
//! never consulted.

use std::sync::Arc;

use chrono::{NaiveDate, Weekday};
use futures::future::try_join_all;
use tracing::warn;

use crate::db::UserStore;
use crate::models::{
    Business, DayStatus, TeamMemberAvailability, TeamMemberSnapshot, TeamSelection, UserProfile,
    AVAILABLE, NOT_SET,
};
use crate::utils::{AppError, AppResult};

const WEEK: [(Weekday, &str); 7] = [
    (Weekday::Mon, "Monday"),
    (Weekday::Tue, "Tuesday"),
    (Weekday::Wed, "Wednesday"),
    (Weekday::Thu, "Thursday"),
    (Weekday::Fri, "Friday"),
    (Weekday::Sat, "Saturday"),
    (Weekday::Sun, "Sunday"),
];

#[derive(Clone)]
pub struct AvailabilityResolver {
    users: Arc<dyn UserStore>,
}

impl AvailabilityResolver {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Profiles for every identity the business references, in mapping order.
    /// Identities without a stored profile are skipped.
    pub async fn resolve_team(&self, business: &Business) -> AppResult<Vec<UserProfile>> {
        let lookups = business.team_member_ids().map(|id| self.users.get(id));
        let profiles = try_join_all(lookups).await?;

        Ok(business
            .team_member_ids()
            .zip(profiles)
            .filter_map(|(id, profile)| {
                if profile.is_none() {
                    warn!(
                        business_id = %business.id,
                        "Team member {} has no profile; skipping",
                        id
                    );
                }
                profile
            })
            .collect())
    }

    /// Per-day status of every team member, optionally flagged for one date
    pub async fn team_availability(
        &self,
        business: &Business,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<TeamMemberAvailability>> {
        let team = self.resolve_team(business).await?;
        Ok(team
            .iter()
            .map(|profile| member_availability(profile, date))
            .collect())
    }

    /// Freeze a team selection into snapshots at commit time
    pub async fn select(
        &self,
        business: &Business,
        selection: &TeamSelection,
    ) -> AppResult<Vec<TeamMemberSnapshot>> {
        match selection {
            TeamSelection::Unassigned => Ok(Vec::new()),
            TeamSelection::All => Ok(self
                .resolve_team(business)
                .await?
                .iter()
                .map(snapshot_of)
                .collect()),
            TeamSelection::Member(id) => {
                if !business.has_team_member(id) {
                    return Err(AppError::not_found(format!(
                        "Team member {} not found for business {}",
                        id, business.id
                    )));
                }
                let profile = self.users.get(id).await?.ok_or_else(|| {
                    AppError::not_found(format!("Team member profile {} not found", id))
                })?;
                Ok(vec![snapshot_of(&profile)])
            }
        }
    }
}

fn snapshot_of(profile: &UserProfile) -> TeamMemberSnapshot {
    TeamMemberSnapshot {
        id: profile.id.clone(),
        display_name: profile.display_name.clone(),
    }
}

fn member_availability(profile: &UserProfile, date: Option<NaiveDate>) -> TeamMemberAvailability {
    let days = WEEK
        .iter()
        .map(|(weekday, name)| {
            let status = profile.status_on(*weekday).unwrap_or(NOT_SET);
            DayStatus {
                day: name.to_string(),
                status: status.to_string(),
                available: status == AVAILABLE,
            }
        })
        .collect();

    TeamMemberAvailability {
        id: profile.id.clone(),
        display_name: profile.display_name.clone(),
        email: profile.email.clone(),
        days,
        available_on_date: date.map(|d| profile.is_available_on(d)),
    }
}
