//! Public business browsing endpoints

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::parse_uuid;
use crate::{
    models::{parse_date, Business, Service, TeamMemberAvailability},
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_businesses))
        .route("/{id}", get(get_business))
        .route("/{id}/services", get(list_services))
        .route("/{id}/team", get(list_team))
}

#[derive(Debug, Deserialize)]
struct TeamQuery {
    /// `YYYY-MM-DD`; flags each member's availability for that day
    date: Option<String>,
}

async fn list_businesses(State(state): State<AppState>) -> Result<Json<Vec<Business>>, AppError> {
    Ok(Json(state.catalog.list_businesses().await?))
}

async fn get_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Business>, AppError> {
    let id = parse_uuid(&id, "business")?;
    Ok(Json(state.catalog.get_business(id).await?))
}

async fn list_services(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Service>>, AppError> {
    let id = parse_uuid(&id, "business")?;
    Ok(Json(state.catalog.list_services(id).await?))
}

async fn list_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TeamQuery>,
) -> Result<Json<Vec<TeamMemberAvailability>>, AppError> {
    let id = parse_uuid(&id, "business")?;
    let date = query
        .date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(parse_date)
        .transpose()?;

    Ok(Json(state.catalog.team_availability(id, date).await?))
}
