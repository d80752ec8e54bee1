//! Customer booking endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::session_for;
use crate::{
    middleware::AuthUser,
    models::{Appointment, BookingRequest, SessionContext},
    services::{booking_link, LifecycleOutcome, ResolvedBookingLink},
    utils::AppError,
    AppState,
};

/// `/booking` routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/resolve", get(resolve_link))
}

/// `/appointments` routes; authentication is optional
pub fn appointment_routes() -> Router<AppState> {
    Router::new().route("/", post(create_appointment))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveQuery {
    business: String,
    service: Option<String>,
    team_member: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResolveResponse {
    #[serde(flatten)]
    resolved: ResolvedBookingLink,
    /// Canonical link for what was resolved
    link: String,
}

async fn resolve_link(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolveResponse>, AppError> {
    let resolved = state
        .booking_links
        .resolve(
            &query.business,
            query.service.as_deref(),
            query.team_member.as_deref(),
        )
        .await?;

    let member_name = query
        .team_member
        .as_deref()
        .filter(|_| resolved.team_member.is_some());
    let link = booking_link(&resolved.business, resolved.service.as_ref(), member_name);

    Ok(Json(ResolveResponse { resolved, link }))
}

async fn create_appointment(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    Json(payload): Json<BookingRequest>,
) -> Result<(StatusCode, Json<LifecycleOutcome<Appointment>>), AppError> {
    let session = match auth_user {
        Some(Extension(user)) => session_for(&state, &user).await?,
        None => SessionContext::anonymous(),
    };

    let outcome = state.booking.create(&session, payload).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}
