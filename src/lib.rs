//! Appointly Library
//!
//! Multi-tenant appointment booking: business owners manage their business,
//! services and team; customers book appointments; owners edit, reschedule
//! and cancel them. Every committed change is followed by one notification.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use db::{DbPool, Stores};
pub use middleware::{auth_middleware, AuthUser, Claims};

use db::UserStore;
use services::{
    ActorLabels, AvailabilityResolver, BookingLinkService, BookingService, CatalogService,
    NotificationDispatcher,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Database connection pool
    pub db: DbPool,
    /// Appointment lifecycle manager
    pub booking: Arc<BookingService>,
    /// Business, service, team and profile management
    pub catalog: Arc<CatalogService>,
    pub booking_links: Arc<BookingLinkService>,
    /// Profile lookups for session display names
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Wire the services over the SQLite repositories
    pub fn new(config: AppConfig, db: DbPool, notifier: Arc<dyn NotificationDispatcher>) -> Self {
        let stores = Stores::sqlite(&db);
        Self::with_stores(config, db, stores, notifier)
    }

    /// Wire the services over arbitrary storage ports
    pub fn with_stores(
        config: AppConfig,
        db: DbPool,
        stores: Stores,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        let resolver = AvailabilityResolver::new(stores.users.clone());
        let labels = ActorLabels::from(&config.notifications);

        let booking = BookingService::new(
            stores.businesses.clone(),
            stores.services.clone(),
            stores.appointments.clone(),
            resolver.clone(),
            notifier,
            labels,
        );
        let catalog = CatalogService::new(
            stores.businesses.clone(),
            stores.services.clone(),
            stores.users.clone(),
            resolver.clone(),
        );
        let booking_links =
            BookingLinkService::new(stores.businesses.clone(), stores.services.clone(), resolver);

        Self {
            config,
            db,
            booking: Arc::new(booking),
            catalog: Arc::new(catalog),
            booking_links: Arc::new(booking_links),
            users: stores.users,
        }
    }
}
