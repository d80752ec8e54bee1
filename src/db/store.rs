//! Storage ports
//!
//! One trait per document collection. Each call is a single-document read or
//! write; nothing here spans documents or offers transactions.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{AppointmentRepository, BusinessRepository, ServiceRepository, UserRepository};
use crate::models::{Appointment, AppointmentStatus, Business, Service, UserProfile};
use crate::utils::AppResult;

#[async_trait]
pub trait BusinessStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Business>>;
    async fn get(&self, id: Uuid) -> AppResult<Option<Business>>;
    /// Businesses whose owner matches, oldest first
    async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<Business>>;
    async fn insert(&self, business: &Business) -> AppResult<()>;
    /// Full-document replace; false when the id is absent
    async fn update(&self, business: &Business) -> AppResult<bool>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<Service>>;
    async fn get(&self, id: Uuid) -> AppResult<Option<Service>>;
    async fn insert(&self, service: &Service) -> AppResult<()>;
    async fn update(&self, service: &Service) -> AppResult<bool>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn get(&self, id: Uuid) -> AppResult<Option<Appointment>>;
    async fn list_by_business_and_status(
        &self,
        business_id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<Vec<Appointment>>;
    async fn insert(&self, appointment: &Appointment) -> AppResult<()>;
    async fn update(&self, appointment: &Appointment) -> AppResult<bool>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: &str) -> AppResult<Option<UserProfile>>;
    async fn upsert(&self, profile: &UserProfile) -> AppResult<()>;
}

/// The four storage ports, as wired into the services
#[derive(Clone)]
pub struct Stores {
    pub businesses: Arc<dyn BusinessStore>,
    pub services: Arc<dyn ServiceStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    /// SQLite-backed stores sharing one pool
    pub fn sqlite(pool: &SqlitePool) -> Self {
        Self {
            businesses: Arc::new(BusinessRepository::new(pool.clone())),
            services: Arc::new(ServiceRepository::new(pool.clone())),
            appointments: Arc::new(AppointmentRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
        }
    }
}
