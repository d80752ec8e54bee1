//! Middleware components
//!
//! This module contains middleware for:
//! - Authentication (JWT bearer tokens)
//! - Role checks for business-owner routes

pub mod auth;
pub mod rbac;

pub use auth::{auth_middleware, optional_auth_middleware, AuthUser, Claims};
pub use rbac::require_admin;
