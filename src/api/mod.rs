//! API routes and handlers
//!
//! This module defines all API endpoints and their routing.

use axum::{routing::get, Router};
use uuid::Uuid;

use crate::{
    middleware::{self, AuthUser},
    models::SessionContext,
    utils::{AppError, AppResult},
    AppState,
};

mod admin;
mod appointments;
mod booking;
mod businesses;
mod health;
mod profile;

pub use health::*;

/// Public API routes (no authentication required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/detailed", get(health::health_check_detailed))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/businesses", businesses::routes())
        .nest("/booking", booking::routes())
}

/// Customer booking; a bearer token is honoured but not required
pub fn booking_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/appointments", booking::appointment_routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::optional_auth_middleware,
        ))
}

/// Protected API routes (authentication required)
pub fn protected_routes() -> Router<AppState> {
    Router::new().nest("/profile", profile::routes())
}

/// Business-owner routes (authentication and `admin` role required)
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .merge(admin::routes())
        .nest("/appointments", appointments::routes())
        .route_layer(axum::middleware::from_fn(middleware::require_admin))
}

/// Full `/api/v1` router with state applied
pub fn create_router(state: AppState) -> Router {
    let authenticated = Router::new()
        .merge(protected_routes())
        .nest("/admin", admin_routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let api = public_routes()
        .merge(booking_routes(state.clone()))
        .merge(authenticated);

    Router::new().nest("/api/v1", api).with_state(state)
}

/// Build the explicit session for a lifecycle call from the token and profile
pub(crate) async fn session_for(state: &AppState, user: &AuthUser) -> AppResult<SessionContext> {
    let display_name = state.users.get(&user.id).await?.map(|p| p.display_name);
    Ok(SessionContext::authenticated(user.id.clone(), display_name))
}

pub(crate) fn parse_uuid(value: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| AppError::bad_request(format!("Invalid {} ID", what)))
}
