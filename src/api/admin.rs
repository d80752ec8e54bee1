//! Business-owner management endpoints (admin role)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};

use super::{parse_uuid, session_for};
use crate::{
    middleware::AuthUser,
    models::{Business, BusinessRequest, CreateServiceRequest, Service, UpdateServiceRequest},
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/business",
            axum::routing::get(get_business)
                .post(create_business)
                .put(update_business)
                .delete(delete_business),
        )
        .route("/services", post(create_service))
        .route("/services/{id}", put(update_service).delete(delete_service))
        .route(
            "/team/{user_id}",
            put(add_team_member).delete(remove_team_member),
        )
}

async fn get_business(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Business>, AppError> {
    let session = session_for(&state, &auth_user).await?;
    Ok(Json(state.catalog.get_owned_business(&session).await?))
}

async fn create_business(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<BusinessRequest>,
) -> Result<(StatusCode, Json<Business>), AppError> {
    let session = session_for(&state, &auth_user).await?;
    let business = state.catalog.create_business(&session, payload).await?;
    Ok((StatusCode::CREATED, Json(business)))
}

async fn update_business(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<BusinessRequest>,
) -> Result<Json<Business>, AppError> {
    let session = session_for(&state, &auth_user).await?;
    Ok(Json(state.catalog.update_business(&session, payload).await?))
}

async fn delete_business(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<StatusCode, AppError> {
    let session = session_for(&state, &auth_user).await?;
    state.catalog.delete_business(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_service(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    let session = session_for(&state, &auth_user).await?;
    let service = state.catalog.create_service(&session, payload).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

async fn update_service(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<Json<Service>, AppError> {
    let id = parse_uuid(&id, "service")?;
    let session = session_for(&state, &auth_user).await?;
    Ok(Json(state.catalog.update_service(&session, id, payload).await?))
}

async fn delete_service(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_uuid(&id, "service")?;
    let session = session_for(&state, &auth_user).await?;
    state.catalog.delete_service(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_team_member(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Business>, AppError> {
    let session = session_for(&state, &auth_user).await?;
    Ok(Json(state.catalog.add_team_member(&session, &user_id).await?))
}

async fn remove_team_member(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Business>, AppError> {
    let session = session_for(&state, &auth_user).await?;
    Ok(Json(
        state.catalog.remove_team_member(&session, &user_id).await?,
    ))
}
