//! Owner appointment management: list, edit, reschedule, cancel

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use super::{parse_uuid, session_for};
use crate::{
    middleware::AuthUser,
    models::{Appointment, AppointmentPatch, RescheduleRequest},
    services::LifecycleOutcome,
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_booked))
        .route(
            "/{id}",
            get(get_appointment)
                .put(edit_appointment)
                .delete(cancel_appointment),
        )
        .route("/{id}/reschedule", post(reschedule_appointment))
}

async fn list_booked(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let session = session_for(&state, &auth_user).await?;
    Ok(Json(state.booking.list_booked_for_owner(&session).await?))
}

async fn get_appointment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, AppError> {
    let id = parse_uuid(&id, "appointment")?;
    let session = session_for(&state, &auth_user).await?;
    Ok(Json(state.booking.get(&session, id).await?))
}

async fn edit_appointment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(patch): Json<AppointmentPatch>,
) -> Result<Json<LifecycleOutcome<Appointment>>, AppError> {
    let id = parse_uuid(&id, "appointment")?;
    let session = session_for(&state, &auth_user).await?;
    Ok(Json(state.booking.edit(&session, id, patch).await?))
}

async fn reschedule_appointment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<RescheduleRequest>,
) -> Result<Json<LifecycleOutcome<Appointment>>, AppError> {
    let id = parse_uuid(&id, "appointment")?;
    let session = session_for(&state, &auth_user).await?;
    Ok(Json(state.booking.reschedule(&session, id, payload).await?))
}

async fn cancel_appointment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<LifecycleOutcome<Appointment>>, AppError> {
    let id = parse_uuid(&id, "appointment")?;
    let session = session_for(&state, &auth_user).await?;
    Ok(Json(state.booking.cancel(&session, id).await?))
}
