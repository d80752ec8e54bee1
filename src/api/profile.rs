//! Own-profile endpoints for any authenticated user

use axum::{extract::State, routing::get, Json, Router};

use crate::{
    middleware::AuthUser,
    models::{UpsertProfileRequest, UserProfile},
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(upsert_profile))
}

async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.catalog.get_profile(&auth_user.id).await?))
}

async fn upsert_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state.catalog.upsert_profile(&auth_user.id, payload).await?;
    tracing::info!(user_id = %auth_user.id, "Profile saved");
    Ok(Json(profile))
}
