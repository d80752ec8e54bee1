//! Business, service, team and profile management

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::availability::AvailabilityResolver;
use crate::db::{BusinessStore, ServiceStore, UserStore};
use crate::models::{
    Business, BusinessCategory, BusinessRequest, CreateServiceRequest, Service, SessionContext,
    TeamAssignment, TeamMemberAvailability, UpdateServiceRequest, UpsertProfileRequest,
    UserProfile,
};
use crate::utils::validation::{is_blank, validate_email};
use crate::utils::{AppError, AppResult};

pub struct CatalogService {
    businesses: Arc<dyn BusinessStore>,
    services: Arc<dyn ServiceStore>,
    users: Arc<dyn UserStore>,
    resolver: AvailabilityResolver,
}

impl CatalogService {
    pub fn new(
        businesses: Arc<dyn BusinessStore>,
        services: Arc<dyn ServiceStore>,
        users: Arc<dyn UserStore>,
        resolver: AvailabilityResolver,
    ) -> Self {
        Self {
            businesses,
            services,
            users,
            resolver,
        }
    }

    // ------------------------------------------------------------------
    // Public browse
    // ------------------------------------------------------------------

    pub async fn list_businesses(&self) -> AppResult<Vec<Business>> {
        self.businesses.list().await
    }

    pub async fn get_business(&self, id: Uuid) -> AppResult<Business> {
        self.businesses
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Business {} not found", id)))
    }

    pub async fn list_services(&self, business_id: Uuid) -> AppResult<Vec<Service>> {
        let business = self.get_business(business_id).await?;
        self.services.list_by_business(business.id).await
    }

    pub async fn team_availability(
        &self,
        business_id: Uuid,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<TeamMemberAvailability>> {
        let business = self.get_business(business_id).await?;
        self.resolver.team_availability(&business, date).await
    }

    // ------------------------------------------------------------------
    // Owner business
    // ------------------------------------------------------------------

    /// First business owned by the session user
    pub async fn get_owned_business(&self, session: &SessionContext) -> AppResult<Business> {
        let owner = owner_id(session)?;
        self.businesses
            .find_by_owner(owner)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found("No businesses found for the user."))
    }

    pub async fn create_business(
        &self,
        session: &SessionContext,
        request: BusinessRequest,
    ) -> AppResult<Business> {
        let owner = owner_id(session)?;
        request.validate()?;
        let category = parse_category(&request.category)?;

        if !self.businesses.find_by_owner(owner).await?.is_empty() {
            return Err(AppError::conflict("User already owns a business"));
        }

        let now = Utc::now();
        let business = Business {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            description: request.description,
            phone: request.phone,
            address: request.address,
            category,
            logo_url: request.logo_url,
            owner_id: owner.to_string(),
            team_availability: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.businesses.insert(&business).await?;
        info!(business_id = %business.id, owner = owner, "Business created");
        Ok(business)
    }

    pub async fn update_business(
        &self,
        session: &SessionContext,
        request: BusinessRequest,
    ) -> AppResult<Business> {
        request.validate()?;
        let category = parse_category(&request.category)?;
        let mut business = self.get_owned_business(session).await?;

        business.name = request.name.trim().to_string();
        business.description = request.description;
        business.phone = request.phone;
        business.address = request.address;
        business.category = category;
        business.logo_url = request.logo_url;

        self.save_business(business).await
    }

    /// Removes the business document only; its services and appointments stay
    pub async fn delete_business(&self, session: &SessionContext) -> AppResult<()> {
        let business = self.get_owned_business(session).await?;
        if !self.businesses.delete(business.id).await? {
            return Err(AppError::not_found(format!(
                "Business {} not found",
                business.id
            )));
        }
        info!(business_id = %business.id, "Business deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Services
    // ------------------------------------------------------------------

    pub async fn create_service(
        &self,
        session: &SessionContext,
        request: CreateServiceRequest,
    ) -> AppResult<Service> {
        if is_blank(&request.name) {
            return Err(AppError::validation("name is required"));
        }
        let business = self.get_owned_business(session).await?;

        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            business_id: business.id,
            name: request.name.trim().to_string(),
            description: request.description,
            duration: request.duration,
            created_at: now,
            updated_at: now,
        };

        self.services.insert(&service).await?;
        info!(service_id = %service.id, business_id = %business.id, "Service created");
        Ok(service)
    }

    pub async fn update_service(
        &self,
        session: &SessionContext,
        id: Uuid,
        request: UpdateServiceRequest,
    ) -> AppResult<Service> {
        if request.name.as_deref().is_some_and(is_blank) {
            return Err(AppError::validation("name cannot be empty"));
        }
        let mut service = self.owned_service(session, id).await?;

        if let Some(name) = request.name {
            service.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            service.description = description;
        }
        if let Some(duration) = request.duration {
            service.duration = duration;
        }
        service.updated_at = Utc::now();

        if !self.services.update(&service).await? {
            return Err(AppError::not_found(format!("Service {} not found", id)));
        }
        Ok(service)
    }

    pub async fn delete_service(&self, session: &SessionContext, id: Uuid) -> AppResult<()> {
        let service = self.owned_service(session, id).await?;
        if !self.services.delete(service.id).await? {
            return Err(AppError::not_found(format!("Service {} not found", id)));
        }
        info!(service_id = %id, "Service deleted");
        Ok(())
    }

    async fn owned_service(&self, session: &SessionContext, id: Uuid) -> AppResult<Service> {
        let business = self.get_owned_business(session).await?;
        self.services
            .get(id)
            .await?
            .filter(|s| s.business_id == business.id)
            .ok_or_else(|| AppError::not_found(format!("Service {} not found", id)))
    }

    // ------------------------------------------------------------------
    // Team
    // ------------------------------------------------------------------

    /// Append a user to the team mapping; adding an existing member is a no-op
    pub async fn add_team_member(
        &self,
        session: &SessionContext,
        user_id: &str,
    ) -> AppResult<Business> {
        let mut business = self.get_owned_business(session).await?;

        if self.users.get(user_id).await?.is_none() {
            return Err(AppError::not_found(format!("User {} not found", user_id)));
        }
        if business.has_team_member(user_id) {
            return Ok(business);
        }

        business.team_availability.push(TeamAssignment {
            user_id: user_id.to_string(),
            included: true,
        });
        let business = self.save_business(business).await?;
        info!(business_id = %business.id, "Team member {} added", user_id);
        Ok(business)
    }

    pub async fn remove_team_member(
        &self,
        session: &SessionContext,
        user_id: &str,
    ) -> AppResult<Business> {
        let mut business = self.get_owned_business(session).await?;
        if !business.has_team_member(user_id) {
            return Err(AppError::not_found(format!(
                "Team member {} not found",
                user_id
            )));
        }

        business.team_availability.retain(|a| a.user_id != user_id);
        let business = self.save_business(business).await?;
        info!(business_id = %business.id, "Team member {} removed", user_id);
        Ok(business)
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    pub async fn get_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Profile for {} not found", user_id)))
    }

    pub async fn upsert_profile(
        &self,
        user_id: &str,
        request: UpsertProfileRequest,
    ) -> AppResult<UserProfile> {
        if is_blank(&request.display_name) {
            return Err(AppError::validation("displayName is required"));
        }
        if !validate_email(request.email.trim()) {
            return Err(AppError::validation("email is not a valid email address"));
        }

        let profile = UserProfile {
            id: user_id.to_string(),
            display_name: request.display_name.trim().to_string(),
            email: request.email.trim().to_string(),
            role: request.role,
            availability: request.availability,
            updated_at: Utc::now(),
        };
        self.users.upsert(&profile).await?;
        Ok(profile)
    }

    async fn save_business(&self, mut business: Business) -> AppResult<Business> {
        business.updated_at = Utc::now();
        if !self.businesses.update(&business).await? {
            return Err(AppError::not_found(format!(
                "Business {} not found",
                business.id
            )));
        }
        Ok(business)
    }
}

fn owner_id(session: &SessionContext) -> AppResult<&str> {
    session
        .user_id
        .as_deref()
        .ok_or_else(|| AppError::unauthorized("Authentication required"))
}

fn parse_category(value: &str) -> AppResult<BusinessCategory> {
    value.trim().parse().map_err(AppError::Validation)
}
