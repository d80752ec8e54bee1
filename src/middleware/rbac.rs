//! Role gate for business-owner routes
//!
//! Runs after `auth_middleware`; rejects users whose token lacks the role.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::{models::UserRole, utils::error::ErrorResponse};

use super::auth::AuthUser;

/// Role gate error types
#[derive(Debug)]
pub enum RoleError {
    /// User is not authenticated
    NotAuthenticated,
    /// User lacks the required role
    MissingRole(UserRole),
}

impl IntoResponse for RoleError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            RoleError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            RoleError::MissingRole(role) => (
                StatusCode::FORBIDDEN,
                "forbidden",
                format!("Role '{}' required", role.as_str()),
            ),
        };

        (status, Json(ErrorResponse::new(error_type, message))).into_response()
    }
}

/// Check that the authenticated user carries `role`
pub fn check_role(auth_user: Option<&AuthUser>, role: UserRole) -> Result<(), RoleError> {
    let user = auth_user.ok_or(RoleError::NotAuthenticated)?;
    if user.has_role(role) {
        Ok(())
    } else {
        Err(RoleError::MissingRole(role))
    }
}

/// Middleware requiring the `admin` (business owner) role
pub async fn require_admin(request: Request, next: Next) -> Result<Response, RoleError> {
    check_role(request.extensions().get::<AuthUser>(), UserRole::Admin)?;
    Ok(next.run(request).await)
}
