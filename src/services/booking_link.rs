//! Shareable booking links
//!
//! A link carries slugs of the business, service and team member names:
//! `/customer/booking?business=<slug>&service=<slug>&teamMember=<slug|all>`.
//! Resolving runs business first, then services and team together, then the
//! by-slug lookups. Unknown service or member slugs leave that field unset.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::availability::AvailabilityResolver;
use crate::db::{BusinessStore, ServiceStore};
use crate::models::{Business, Service, ALL_TEAM_MEMBERS};
use crate::utils::validation::slugify;
use crate::utils::{AppError, AppResult};

pub const BOOKING_PATH: &str = "/customer/booking";

/// Selections restored from a booking link
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBookingLink {
    pub business: Business,
    pub service: Option<Service>,
    /// Member identity or `"all"`, ready to submit with a booking
    pub team_member: Option<String>,
}

/// Render the link for a business and optional service/member names
pub fn booking_link(
    business: &Business,
    service: Option<&Service>,
    team_member_name: Option<&str>,
) -> String {
    let mut link = format!(
        "{}?business={}",
        BOOKING_PATH,
        urlencoding::encode(&business.slug())
    );
    if let Some(service) = service {
        link.push_str("&service=");
        link.push_str(&urlencoding::encode(&service.slug()));
    }
    if let Some(name) = team_member_name {
        link.push_str("&teamMember=");
        link.push_str(&urlencoding::encode(&slugify(name)));
    }
    link
}

pub struct BookingLinkService {
    businesses: Arc<dyn BusinessStore>,
    services: Arc<dyn ServiceStore>,
    resolver: AvailabilityResolver,
}

impl BookingLinkService {
    pub fn new(
        businesses: Arc<dyn BusinessStore>,
        services: Arc<dyn ServiceStore>,
        resolver: AvailabilityResolver,
    ) -> Self {
        Self {
            businesses,
            services,
            resolver,
        }
    }

    pub async fn resolve(
        &self,
        business_slug: &str,
        service_slug: Option<&str>,
        team_member_slug: Option<&str>,
    ) -> AppResult<ResolvedBookingLink> {
        let wanted = slugify(business_slug.trim());
        let business = self
            .businesses
            .list()
            .await?
            .into_iter()
            .find(|b| b.slug() == wanted)
            .ok_or_else(|| AppError::not_found(format!("Business '{}' not found", business_slug)))?;

        let (services, team) = futures::try_join!(
            self.services.list_by_business(business.id),
            self.resolver.resolve_team(&business),
        )?;
        debug!(
            business_id = %business.id,
            services = services.len(),
            team = team.len(),
            "Resolving booking link"
        );

        let service = service_slug.filter(|s| !s.trim().is_empty()).and_then(|slug| {
            let slug = slugify(slug.trim());
            let found = services.into_iter().find(|s| s.slug() == slug);
            if found.is_none() {
                warn!(business_id = %business.id, "No service matches slug '{}'", slug);
            }
            found
        });

        let team_member = team_member_slug
            .filter(|s| !s.trim().is_empty())
            .and_then(|slug| {
                let slug = slugify(slug.trim());
                if slug == ALL_TEAM_MEMBERS {
                    return Some(ALL_TEAM_MEMBERS.to_string());
                }
                let found = team.iter().find(|m| m.slug() == slug).map(|m| m.id.clone());
                if found.is_none() {
                    warn!(business_id = %business.id, "No team member matches slug '{}'", slug);
                }
                found
            });

        Ok(ResolvedBookingLink {
            business,
            service,
            team_member,
        })
    }
}
